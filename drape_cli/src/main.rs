//! # Drapeline CLI
//!
//! Scripted access to project files: create surveys, edit fields with the
//! same forgiving readers the form uses, print previews and export PDFs.
//!
//! Every editing command locks the file, applies one change, and saves
//! atomically.

mod commands;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use commands::{Cli, Commands};
use drape_core::documents::render_text;
use drape_core::fields::read_selection;
use drape_core::file_io::{load_project, save_project, write_atomic, FileLock};
use drape_core::form::RawForm;
use drape_core::pdf::render_document_pdf;
use drape_core::units::{format_currency, format_plain};
use drape_core::{AppSettings, CalcError, DocumentKind, Project, ProjectField, WindowField};
use tracing::{error, info};

fn main() {
    logging::init_logger();

    let args = Cli::parse();
    if let Err(err) = run(args) {
        // A refused removal is a notice, not a crash
        if let Some(CalcError::LastWindow) = err.downcast_ref::<CalcError>() {
            eprintln!("{}", CalcError::LastWindow);
        } else {
            error!("{:#}", err);
        }
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let settings = AppSettings::load(args.config.as_deref())?;

    let Some(command) = args.command else {
        let _ = Cli::command().print_long_help();
        return Ok(());
    };

    match command {
        Commands::New { file, name } => {
            if file.exists() {
                bail!("{} already exists", file.display());
            }
            let _lock = FileLock::acquire(&file, settings.lock_user())?;
            save_project(&Project::new(name), &file)?;
            println!("Created {}", file.display());
        }
        Commands::Show { file, json } => {
            let project = load_project(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                print_summary(&project);
            }
        }
        Commands::AddWindow { file } => {
            let id = edit_project(&file, &settings, |project| Ok(project.add_window()))?;
            println!("Added window {}", id);
        }
        Commands::RemoveWindow { file, id } => {
            edit_project(&file, &settings, |project| project.remove_window(id).map(|_| ()))?;
            println!("Removed window {}", id);
        }
        Commands::Set { file, window, field, value } => {
            let total = edit_project(&file, &settings, |project| {
                match window {
                    Some(id) => {
                        let field: WindowField = field.parse()?;
                        project.set_window_field(id, field, &value)?;
                    }
                    None => {
                        let field: ProjectField = field.parse()?;
                        project.set_info_field(field, &value);
                    }
                }
                Ok(project.total())
            })?;
            println!("Total: {}", format_currency(total));
        }
        Commands::SelectMaterial { file, window, option } => {
            let selection = read_selection(&option);
            let total = edit_project(&file, &settings, |project| {
                project.select_material(window, selection)?;
                Ok(project.total())
            })?;
            println!("Total: {}", format_currency(total));
        }
        Commands::Preview { file, kind } => {
            let project = load_project(&file)?;
            print!("{}", render_text(&project.document(kind)));
        }
        Commands::Export { file, kind, out } => {
            let project = load_project(&file)?;
            let out = out.unwrap_or_else(|| default_export_path(&settings, &file, kind));
            let pdf = render_document_pdf(&project.document(kind), &settings.fonts())?;
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            write_atomic(&out, &pdf)?;
            info!(path = %out.display(), "Exported document");
            println!("Wrote {}", out.display());
        }
        Commands::Import { form, file, force } => {
            if file.exists() && !force {
                bail!("{} already exists (use --force to replace it)", file.display());
            }
            let json = fs::read_to_string(&form).with_context(|| format!("reading {}", form.display()))?;
            let project = RawForm::from_json(&json)?.into_project();
            let _lock = FileLock::acquire(&file, settings.lock_user())?;
            save_project(&project, &file)?;
            println!(
                "Imported {} window(s), total {}",
                project.windows.len(),
                format_currency(project.total())
            );
        }
        Commands::PrintConfig => {
            println!("{:#?}", settings);
        }
    }

    Ok(())
}

/// Lock, load, apply `change`, save.
fn edit_project<T>(
    file: &Path,
    settings: &AppSettings,
    change: impl FnOnce(&mut Project) -> Result<T, CalcError>,
) -> Result<T> {
    let _lock = FileLock::acquire(file, settings.lock_user())?;
    let mut project = load_project(file)?;
    let result = change(&mut project)?;
    save_project(&project, file)?;
    Ok(result)
}

/// `<output_dir>/<file stem>-<kind>.pdf`
fn default_export_path(settings: &AppSettings, file: &Path, kind: DocumentKind) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    settings.output_dir.join(format!("{}-{}.pdf", stem, kind.code()))
}

fn print_summary(project: &Project) {
    let name = if project.info.name.is_empty() { "(untitled)" } else { project.info.name.as_str() };
    println!("{}", name);
    println!("{}", "=".repeat(40));

    for window in project.windows.iter() {
        let costs = &window.costs;
        let material = window
            .selected_option()
            .map(|m| m.label.as_str())
            .unwrap_or("-");
        println!(
            "{:>3}  {:<12} {:>7} x {:<7} {:>7} 才  {:<8} {:<6} {:>10}",
            window.id,
            window.floor_space,
            format_plain(window.width_cm),
            format_plain(window.height_cm),
            format!("{:.2}", costs.area_tsai),
            material,
            window.install_method.label(),
            format_currency(costs.grand_total),
        );
    }

    println!("{}", "-".repeat(40));
    println!("Total: {}{}", project.settings.currency_symbol, format_currency(project.total()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_export_path() {
        let settings = AppSettings {
            output_dir: PathBuf::from("exports"),
            ..AppSettings::default()
        };
        let path = default_export_path(&settings, Path::new("/surveys/songren.drp"), DocumentKind::InstallOrder);
        assert_eq!(path, PathBuf::from("exports/songren-install.pdf"));
    }

    #[test]
    fn test_edit_project_saves_changes() {
        let file = std::env::temp_dir().join(format!("drapeline_cli_{}.drp", std::process::id()));
        save_project(&Project::new("Site"), &file).unwrap();
        let settings = AppSettings::default();

        let id = edit_project(&file, &settings, |p| Ok(p.add_window())).unwrap();
        assert_eq!(id, 2);
        assert_eq!(load_project(&file).unwrap().windows.len(), 2);

        // A refused edit leaves the file untouched
        edit_project(&file, &settings, |p| p.remove_window(1).map(|_| ())).unwrap();
        let err = edit_project(&file, &settings, |p| p.remove_window(2).map(|_| ())).unwrap_err();
        assert!(matches!(err.downcast_ref::<CalcError>(), Some(CalcError::LastWindow)));
        assert_eq!(load_project(&file).unwrap().windows.ids(), vec![2]);

        let _ = fs::remove_file(&file);
    }

    #[test]
    fn test_import_keeps_existing_file_without_force() {
        let dir = std::env::temp_dir();
        let form = dir.join(format!("drapeline_form_{}.json", std::process::id()));
        let file = dir.join(format!("drapeline_import_{}.drp", std::process::id()));
        fs::write(&form, r#"{ "project": { "name": "新案" }, "windows": [{}, {}] }"#).unwrap();
        save_project(&Project::new("Existing"), &file).unwrap();

        let args = |extra: &[&str]| {
            let mut argv = vec!["drapeline", "import", form.to_str().unwrap(), file.to_str().unwrap()];
            argv.extend_from_slice(extra);
            Cli::try_parse_from(argv).unwrap()
        };

        let err = run(args(&[])).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(load_project(&file).unwrap().info.name, "Existing");

        run(args(&["--force"])).unwrap();
        let imported = load_project(&file).unwrap();
        assert_eq!(imported.info.name, "新案");
        assert_eq!(imported.windows.len(), 2);

        let _ = fs::remove_file(&form);
        let _ = fs::remove_file(&file);
    }
}
