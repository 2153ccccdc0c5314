//! The shared base of the System View and Document View import handlers.

use std::path::PathBuf;

use jcr_value::BufferedStringValue;
use tracing::trace;

use crate::{Importer, NamespaceResolver, NodeInfo, PropInfo, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Started,
    Ended,
}

#[derive(Debug)]
struct OpenNode {
    info: NodeInfo,
    props: Vec<PropInfo>,
}

/// Drives an [`Importer`] with the events of a parsed import document.
///
/// The concrete handlers translate XML events into calls to [`start`](Self::start),
/// [`start_node`](Self::start_node), [`end_node`](Self::end_node) and [`end`](Self::end), which
/// must follow the grammar `start (start_node end_node*)* end` with well-nested nodes.
///
/// The handler owns the [`PropInfo`]s of every open node and disposes their appendable values once
/// the matching `end_node` callback returns, whether it succeeded or not.
#[derive(Debug)]
pub struct TargetImportHandler<I, N> {
    importer: I,
    ns_context: N,
    /// Where new values spill to. `None` is the process' temporary directory.
    temp_dir: Option<PathBuf>,
    phase: Phase,
    open_nodes: Vec<OpenNode>,
    disposed_values: usize,
}

impl<I: Importer, N: NamespaceResolver> TargetImportHandler<I, N> {
    pub fn new(importer: I, ns_context: N) -> Self {
        Self {
            importer,
            ns_context,
            temp_dir: None,
            phase: Phase::NotStarted,
            open_nodes: Vec::new(),
            disposed_values: 0,
        }
    }

    /// Makes values created by [`new_value`](Self::new_value) spill to `temp_dir`.
    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Creates an empty value for accumulating the character data of a property.
    #[must_use]
    pub fn new_value(&self) -> BufferedStringValue {
        match &self.temp_dir {
            Some(dir) => BufferedStringValue::with_temp_dir(dir),
            None => BufferedStringValue::new(),
        }
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    /// The namespace mappings passed to [`Importer::start_node`]. Handlers update them as
    /// prefix mappings go in and out of scope.
    pub fn ns_context_mut(&mut self) -> &mut N {
        &mut self.ns_context
    }

    /// Number of nodes started but not yet ended
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open_nodes.len()
    }

    /// Number of appendable values disposed so far
    #[must_use]
    pub fn disposed_values(&self) -> usize {
        self.disposed_values
    }

    /// Starts the import.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Protocol`] if called twice, or whatever the importer returns.
    pub fn start(&mut self) -> Result<(), RepositoryError> {
        if self.phase != Phase::NotStarted {
            return Err(RepositoryError::Protocol("start called more than once"));
        }
        self.importer.start()?;
        self.phase = Phase::Started;
        Ok(())
    }

    /// Passes a node and its properties to the importer and keeps the properties until the node
    /// is ended. If the importer fails, the property values are disposed right away.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Protocol`] outside of `start` and `end`, or whatever the
    /// importer returns.
    pub fn start_node(
        &mut self,
        info: NodeInfo,
        mut props: Vec<PropInfo>,
    ) -> Result<(), RepositoryError> {
        if self.phase != Phase::Started {
            self.dispose(&mut props);
            return Err(RepositoryError::Protocol("start_node outside of start and end"));
        }
        trace!(name = %info.name, depth = self.open_nodes.len(), "start node");

        match self.importer.start_node(&info, &mut props, &self.ns_context) {
            Ok(()) => {
                self.open_nodes.push(OpenNode { info, props });
                Ok(())
            }
            Err(err) => {
                self.dispose(&mut props);
                Err(err)
            }
        }
    }

    /// Ends the innermost open node and disposes its property values.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Protocol`] if no node is open, or whatever the importer returns.
    pub fn end_node(&mut self) -> Result<(), RepositoryError> {
        let Some(mut node) = self.open_nodes.pop() else {
            return Err(RepositoryError::Protocol("end_node without matching start_node"));
        };
        trace!(name = %node.info.name, depth = self.open_nodes.len(), "end node");

        let result = self.importer.end_node(&node.info);
        self.dispose(&mut node.props);
        result
    }

    /// Ends the import.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Protocol`] if nodes are still open or the import wasn't
    /// started, or whatever the importer returns.
    pub fn end(&mut self) -> Result<(), RepositoryError> {
        if self.phase != Phase::Started {
            return Err(RepositoryError::Protocol("end without start"));
        }
        if !self.open_nodes.is_empty() {
            self.abort();
            return Err(RepositoryError::Protocol("end called with open nodes"));
        }
        self.phase = Phase::Ended;
        self.importer.end()
    }

    /// Abandons the import, disposing the values of every open node.
    pub fn abort(&mut self) {
        while let Some(mut node) = self.open_nodes.pop() {
            self.dispose(&mut node.props);
        }
        self.phase = Phase::Ended;
    }

    /// Consumes the handler, returning the importer. Values of open nodes are disposed.
    pub fn into_importer(mut self) -> I {
        self.abort();
        self.importer
    }

    fn dispose(&mut self, props: &mut [PropInfo]) {
        for prop in props {
            self.disposed_values += prop.dispose_values();
        }
    }
}
