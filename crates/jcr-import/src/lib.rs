//! # Content repository XML import
//!
//! The callback protocol between the System View and Document View XML handlers and an
//! [`Importer`], plus the records passed through it.
//!
//! Serialized property values are [`Value`]s from [`jcr_value`]. The handler that produced them
//! owns them: it lends them to [`Importer::start_node`] and disposes them after the matching
//! [`Importer::end_node`] returns, see [`TargetImportHandler`].

mod error;
pub mod handler;
mod info;
mod name;
mod uuid_behavior;


pub use error::RepositoryError;
pub use handler::TargetImportHandler;
pub use info::{NodeInfo, PropInfo, PropertyType};
pub use jcr_value::{AppendableValue, TextValue, Value};
pub use name::*;
pub use uuid_behavior::UuidBehavior;

/// Receives the contents of an import document.
///
/// Calls follow the grammar `start (start_node end_node*)* end`, where every `end_node` closes the
/// innermost node that was started.
pub trait Importer {
    /// Called once before any node.
    ///
    /// # Errors
    ///
    /// Any error terminates the import.
    fn start(&mut self) -> Result<(), RepositoryError>;

    /// Called for every node with its properties and the prefix mappings in scope.
    ///
    /// The values in `prop_infos` stay valid until [`end_node`](Importer::end_node) returns for
    /// this node. They must not be disposed by the importer.
    ///
    /// # Errors
    ///
    /// Any error terminates the import.
    fn start_node(
        &mut self,
        node_info: &NodeInfo,
        prop_infos: &mut [PropInfo],
        ns_context: &dyn NamespaceResolver,
    ) -> Result<(), RepositoryError>;

    /// # Errors
    ///
    /// Any error terminates the import.
    fn end_node(&mut self, node_info: &NodeInfo) -> Result<(), RepositoryError>;

    /// Called once after all nodes.
    ///
    /// # Errors
    ///
    /// Any error terminates the import.
    fn end(&mut self) -> Result<(), RepositoryError>;
}

impl<I: Importer + ?Sized> Importer for &mut I {
    fn start(&mut self) -> Result<(), RepositoryError> {
        (**self).start()
    }

    fn start_node(
        &mut self,
        node_info: &NodeInfo,
        prop_infos: &mut [PropInfo],
        ns_context: &dyn NamespaceResolver,
    ) -> Result<(), RepositoryError> {
        (**self).start_node(node_info, prop_infos, ns_context)
    }

    fn end_node(&mut self, node_info: &NodeInfo) -> Result<(), RepositoryError> {
        (**self).end_node(node_info)
    }

    fn end(&mut self) -> Result<(), RepositoryError> {
        (**self).end()
    }
}
