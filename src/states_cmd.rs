//! States command: list the state space of a parameter selection.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use nimbus_markov::{ParameterSet, StateSpace};

use crate::cli::StatesArgs;
use crate::labels;

/// Print every state in index order.
pub fn run(args: StatesArgs) -> Result<()> {
    let _cmd = info_span!("states").entered();

    let params: ParameterSet = args
        .params
        .parse()
        .with_context(|| format!("invalid --params: {:?}", args.params))?;
    let space = StateSpace::with_window(&params, args.n_gram)
        .context("failed to enumerate state space")?;
    info!(space = %space.describe(), n_states = space.len(), "enumerated state space");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_states(&mut out, &space, args.describe)?;
    Ok(())
}

fn write_states(out: &mut impl Write, space: &StateSpace, describe: bool) -> std::io::Result<()> {
    let width = space.len().saturating_sub(1).to_string().len();
    for (id, state) in space.iter() {
        write!(out, "{:>width$}  {state}", id.index())?;
        if describe {
            write!(out, "  ({})", labels::describe_state(state))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
