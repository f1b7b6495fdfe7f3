use clap::Parser;
use std::path::PathBuf;

/// Validate an XML file against an XSD schema
#[derive(Parser, Debug, Clone)]
#[command(name = "xsd-check")]
#[command(about = "Validate an XML file against an XSD schema")]
#[command(version)]
pub struct Cli {
    /// Path to the XML file
    #[arg(help = "Path to the XML file")]
    pub xml: PathBuf,

    /// Path to the XSD schema file
    #[arg(help = "Path to the XSD schema file")]
    pub xsd: PathBuf,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cli_parsing() {
        let args = vec!["xsd-check", "doc.xml", "schema.xsd"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.xml, PathBuf::from("doc.xml"));
        assert_eq!(cli.xsd, PathBuf::from("schema.xsd"));
    }

    #[test]
    fn test_both_arguments_required() {
        assert!(Cli::try_parse_from(vec!["xsd-check", "doc.xml"]).is_err());
        assert!(Cli::try_parse_from(vec!["xsd-check"]).is_err());
    }
}
