use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drape_core::DocumentKind;

#[derive(Debug, Parser)]
#[command(name = "drapeline")]
#[command(about = "Curtain survey, pricing and work orders", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./Drapeline.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project file with one empty window
    New {
        file: PathBuf,
        /// Project name or site address
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Print windows, costs and the project total
    Show {
        file: PathBuf,
        /// Print the project as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Append a window
    AddWindow { file: PathBuf },
    /// Remove a window (the last one cannot be removed)
    RemoveWindow { file: PathBuf, id: u32 },
    /// Set a form field from raw text, e.g. `set survey.drp -w 2 width_cm 180`
    Set {
        file: PathBuf,
        /// Window id; omit to set a project field
        #[arg(short, long)]
        window: Option<u32>,
        field: String,
        value: String,
    },
    /// Select a material option for a window (`none` clears it)
    SelectMaterial {
        file: PathBuf,
        window: u32,
        option: String,
    },
    /// Print a document as text
    Preview {
        file: PathBuf,
        #[arg(value_parser = parse_kind)]
        kind: DocumentKind,
    },
    /// Write a document as PDF
    Export {
        file: PathBuf,
        #[arg(value_parser = parse_kind)]
        kind: DocumentKind,
        /// Output path (defaults to <output_dir>/<project>-<kind>.pdf)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Build a project file from a JSON form
    Import {
        form: PathBuf,
        file: PathBuf,
        /// Replace `file` if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings
    PrintConfig,
}

fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    s.parse::<DocumentKind>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_window_field() {
        let cli = Cli::try_parse_from(["drapeline", "set", "survey.drp", "-w", "2", "width_cm", "180"]).unwrap();
        match cli.command {
            Some(Commands::Set { file, window, field, value }) => {
                assert_eq!(file, PathBuf::from("survey.drp"));
                assert_eq!(window, Some(2));
                assert_eq!(field, "width_cm");
                assert_eq!(value, "180");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_project_field() {
        let cli = Cli::try_parse_from(["drapeline", "set", "survey.drp", "surveyor", "王小明"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Set { window: None, .. })));
    }

    #[test]
    fn test_parse_document_kind() {
        let cli = Cli::try_parse_from(["drapeline", "export", "survey.drp", "factory", "-o", "f.pdf"]).unwrap();
        match cli.command {
            Some(Commands::Export { kind, out, .. }) => {
                assert_eq!(kind, DocumentKind::FactoryOrder);
                assert_eq!(out, Some(PathBuf::from("f.pdf")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["drapeline", "preview", "survey.drp", "invoice"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["drapeline", "show", "a.drp", "--config", "shop.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("shop.toml")));
    }

    #[test]
    fn test_import_force_flag() {
        let cli = Cli::try_parse_from(["drapeline", "import", "form.json", "a.drp"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Import { force: false, .. })));
        let cli = Cli::try_parse_from(["drapeline", "import", "form.json", "a.drp", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Import { force: true, .. })));
    }

    #[test]
    fn test_remove_window_requires_id() {
        assert!(Cli::try_parse_from(["drapeline", "remove-window", "a.drp"]).is_err());
        assert!(Cli::try_parse_from(["drapeline", "remove-window", "a.drp", "x"]).is_err());
    }
}
