//! JSON persistence of trained models.
//!
//! A saved model records the parameter selection and window size next to
//! the transition table and generic distribution, so a reloaded model
//! classifies and enumerates exactly as it did when it was trained:
//!
//! ```json
//! {
//!   "parameters": ["tavg", "prcp"],
//!   "n_gram": 1,
//!   "transitions": { "<from>": { "<to>": 0.5, ... }, ... },
//!   "generic": { "<state>": 0.25, ... }
//! }
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nimbus_markov::{GenericDistribution, ParameterSet, TrainedModel, TransitionModel};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IoError;

/// On-disk form of a [`TrainedModel`].
///
/// Deserializing validates the probability tables; converting into a
/// [`TrainedModel`] additionally checks every key against the parameter
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedModel {
    /// Parameter keys in state order.
    pub parameters: ParameterSet,
    /// Days per state.
    pub n_gram: usize,
    /// Source state → destination state → probability.
    pub transitions: TransitionModel,
    /// Marginal probability of each destination state.
    pub generic: GenericDistribution,
}

impl From<&TrainedModel> for SavedModel {
    fn from(model: &TrainedModel) -> Self {
        Self {
            parameters: model.parameters().clone(),
            n_gram: model.n_gram(),
            transitions: model.transitions().clone(),
            generic: model.generic().clone(),
        }
    }
}

impl TryFrom<SavedModel> for TrainedModel {
    type Error = IoError;

    fn try_from(saved: SavedModel) -> Result<Self, Self::Error> {
        Ok(TrainedModel::from_parts(
            saved.parameters,
            saved.n_gram,
            saved.transitions,
            saved.generic,
        )?)
    }
}

/// Write `model` to `path` as pretty-printed JSON.
///
/// Parent directories are created if needed.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be written and
/// [`IoError::Json`] if serialization fails.
pub fn write_model(path: &Path, model: &TrainedModel) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let saved = SavedModel::from(model);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &saved)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        path = %path.display(),
        n_sources = saved.transitions.len(),
        n_destinations = saved.generic.len(),
        "wrote model"
    );
    Ok(())
}

/// Read a model written by [`write_model`].
///
/// # Errors
///
/// - [`IoError::FileNotFound`] if `path` does not exist.
/// - [`IoError::Json`] on malformed JSON, unknown parameter keys or
///   probability rows that do not sum to 1.
/// - [`IoError::Markov`] if a state does not belong to the saved
///   parameter selection.
pub fn read_model(path: &Path) -> Result<TrainedModel, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    let saved: SavedModel = serde_json::from_reader(reader)?;
    let model = TrainedModel::try_from(saved)?;
    info!(
        path = %path.display(),
        params = %model.parameters(),
        n_gram = model.n_gram(),
        "read model"
    );
    Ok(model)
}
