//! Command dispatch: one function per subcommand.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{Dispatched, TreeView};
use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{item_line, TreeRender};
use crate::config::Settings;
use crate::domain::{ItemId, Parent, Tree};
use crate::infrastructure::di::ServiceContainer;

/// Rows and dialogs of the CLI have no element handles.
type CliView = TreeView<()>;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let seed = cli.seed.as_deref();

    match &cli.command {
        None | Some(Commands::Show) => cmd_show(&container, seed),
        Some(Commands::Apply { script, format }) => cmd_apply(&container, seed, script, *format),
        Some(Commands::Path { id }) => cmd_path(&container, seed, id),
        Some(Commands::Children { parent }) => cmd_children(&container, seed, parent.as_deref()),
        Some(Commands::Targets { id }) => cmd_targets(&container, seed, id),
        Some(Commands::Rows) => cmd_rows(&container, seed),
        Some(Commands::Config) => cmd_config(&container),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

fn mount(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<CliView> {
    Ok(container.mount_view(seed)?)
}

fn print_tree(tree: &Tree, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Tree => output::info(&tree.to_tree_string()),
        OutputFormat::Toml => {
            let toml = toml::to_string_pretty(tree)
                .map_err(|e| CliError::Usage(format!("cannot serialize tree: {}", e)))?;
            output::info(&toml);
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<()> {
    let view = mount(container, seed)?;
    print_tree(view.tree(), OutputFormat::Tree)
}

#[instrument(skip(container))]
fn cmd_apply(
    container: &ServiceContainer,
    seed: Option<&Path>,
    script: &Path,
    format: OutputFormat,
) -> CliResult<()> {
    let mut view = mount(container, seed)?;
    let actions = container.loader().load_script(script)?;
    debug!(actions = actions.len(), "replaying script");

    for (n, action) in actions.into_iter().enumerate() {
        let step = format!("#{} {} {}", n + 1, action.kind(), action.item_id());
        match view.dispatch(action) {
            Ok(Dispatched::Applied { revision }) => {
                output::success(&format!("{step}: applied (revision {revision})"))
            }
            Ok(Dispatched::Unchanged) => output::skipped(&format!("{step}: unchanged")),
            Ok(Dispatched::Blocked(instruction)) => {
                output::failure(&format!("{step}: blocked ({})", instruction.desired().kind()))
            }
            Ok(Dispatched::IllegalParent(parent)) => {
                output::failure(&format!("{step}: cannot move under {parent}"))
            }
            Err(e) => {
                output::failure(&format!("{step}: {e}"));
                return Err(e.into());
            }
        }
    }

    output::header(&format!("Revision {}", view.store().revision()));
    print_tree(view.tree(), format)
}

#[instrument(skip(container))]
fn cmd_path(container: &ServiceContainer, seed: Option<&Path>, id: &str) -> CliResult<()> {
    let view = mount(container, seed)?;
    let path = view.get_path_to_item(&ItemId::from(id))?;
    output::info(&path.iter().join(" › "));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_children(
    container: &ServiceContainer,
    seed: Option<&Path>,
    parent: Option<&str>,
) -> CliResult<()> {
    let view = mount(container, seed)?;
    let parent = parent.map(Parent::from).unwrap_or_default();
    for child in view.get_children_of_item(&parent)? {
        output::info(&item_line(&child));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_targets(container: &ServiceContainer, seed: Option<&Path>, id: &str) -> CliResult<()> {
    let view = mount(container, seed)?;
    let item_id = ItemId::from(id);
    if !view.store().queries().contains(&item_id) {
        output::warning(&format!("unknown item {item_id}, listing every parent"));
    }
    for target in view.get_move_targets(&item_id) {
        let indent = "  ".repeat(target.level);
        match target.parent.item_id() {
            Some(parent_id) => output::info(&format!("{indent}{} ({parent_id})", target.label)),
            None => output::info(&format!("{indent}{}", target.label)),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_rows(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<()> {
    let view = mount(container, seed)?;
    let queries = view.store().queries();
    for row in view.visible_rows() {
        let item = queries.item(&row.id)?;
        output::info(&format!(
            "{}{} [level={} index={} mode={}]",
            "  ".repeat(row.level),
            item_line(item),
            row.level,
            row.index,
            row.mode
        ));
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer) -> CliResult<()> {
    output::header("Effective settings");
    output::info(&container.settings.to_toml()?);
    match crate::config::global_config_path() {
        Some(path) => output::detail(&format!("global config: {}", path.display())),
        None => output::detail("global config: unavailable"),
    }
    Ok(())
}
