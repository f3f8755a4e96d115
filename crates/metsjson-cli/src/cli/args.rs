use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metsjson",
    version,
    about = "Convert an Archivematica METS document into a JSON package manifest"
)]
pub struct Cli {
    /// METS XML document to convert (prompted for when omitted)
    #[arg(long, env = "METSJSON_METS")]
    pub mets: Option<PathBuf>,

    /// Existing directory that receives <package>_metadata.json (prompted for when omitted)
    #[arg(long, env = "METSJSON_OUT")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from(["metsjson", "--mets", "in/METS.xml", "--out", "out"])
            .expect("parse should succeed");
        assert_eq!(cli.mets, Some(PathBuf::from("in/METS.xml")));
        assert_eq!(cli.out, Some(PathBuf::from("out")));
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["metsjson", "METS.xml"]).is_err());
    }
}
