//! Node tree: data model, classification, digest driver, and wire form
//!
//! A digested artifact is represented as a tree of nodes. Each node owns
//! its children (reference-counted handles) and holds a non-owning link
//! back to its parent, so the tree is acyclic by construction and dropping
//! the tree drops every node.

pub mod digest;
pub mod flavor;
pub mod node;
pub mod reply;

pub use digest::Tree;
pub use flavor::Flavor;
pub use node::{DataContent, FileContent, Meta, Node, NodeContent, NodeRef};
pub use reply::{ReplyData, ReplyFile, ReplyMeta, ReplyNode, WhisperReply};
