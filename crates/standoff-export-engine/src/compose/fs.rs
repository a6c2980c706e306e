use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{ItemComposer, ItemComposition};
use crate::error::ExportError;
use crate::model::Item;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ComposeError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

struct FlowWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

/// Appends every flow of every composed item to `<output_dir>/<key>.xml`.
///
/// Files are created lazily the first time a flow key appears, starting with
/// `head`; [`FsComposer::close`] writes `tail` and flushes them.
pub struct FsComposer {
    composer: ItemComposer,
    output_dir: PathBuf,
    head: Option<String>,
    tail: Option<String>,
    writers: BTreeMap<String, FlowWriter>,
}

impl FsComposer {
    pub fn new(composer: ItemComposer, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            composer,
            output_dir: output_dir.into(),
            head: None,
            tail: None,
            writers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the file receiving a flow.
    pub fn flow_path(&self, key: &str) -> PathBuf {
        flow_path(&self.output_dir, key)
    }

    /// Composes `item` and appends its flows. The output files are untouched
    /// when composition fails.
    pub fn compose(&mut self, item: &Item, item_nr: usize) -> Result<ItemComposition, ComposeError> {
        let composition = self.composer.compose(item, item_nr)?;
        for (key, flow) in &composition.flows {
            let writer = self.writer(key)?;
            writeln!(writer.out, "{flow}").map_err(ComposeError::io(&writer.path))?;
        }
        Ok(composition)
    }

    fn writer(&mut self, key: &str) -> Result<&mut FlowWriter, ComposeError> {
        match self.writers.entry(key.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = flow_path(&self.output_dir, key);
                fs::create_dir_all(&self.output_dir).map_err(ComposeError::io(&self.output_dir))?;
                let file = File::create(&path).map_err(ComposeError::io(&path))?;
                let mut out = BufWriter::new(file);
                if let Some(head) = &self.head {
                    writeln!(out, "{head}").map_err(ComposeError::io(&path))?;
                }
                info!("Writing flow {key} to {}", path.display());
                Ok(entry.insert(FlowWriter { path, out }))
            }
        }
    }

    /// Writes the tail to every open file and flushes it.
    pub fn close(&mut self) -> Result<(), ComposeError> {
        for (key, mut writer) in std::mem::take(&mut self.writers) {
            if let Some(tail) = &self.tail {
                writeln!(writer.out, "{tail}").map_err(ComposeError::io(&writer.path))?;
            }
            writer.out.flush().map_err(ComposeError::io(&writer.path))?;
            debug!("Closed flow {key}");
        }
        Ok(())
    }
}

fn flow_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.xml", flow_file_stem(key)))
}

/// Layer keys may contain `|` and other characters unsafe in file names.
fn flow_file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
