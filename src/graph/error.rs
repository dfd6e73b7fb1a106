use std::fmt::{Display, Formatter};

use crate::impl_err;

#[derive(Debug)]
pub enum GraphError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateNode(String),
    DuplicateEdge(String),
    UnknownNode { edge: String, node: String },
    InvalidAttribute { id: String, reason: String },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Io(err) => write!(f, "unable to read graph source: {err}"),
            GraphError::Csv(err) => write!(f, "malformed graph record: {err}"),
            GraphError::DuplicateNode(id) => write!(f, "node {id} is defined more than once"),
            GraphError::DuplicateEdge(id) => write!(f, "edge {id} is defined more than once"),
            GraphError::UnknownNode { edge, node } => {
                write!(f, "edge {edge} references unknown node {node}")
            }
            GraphError::InvalidAttribute { id, reason } => write!(f, "{id}: {reason}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Io(err) => Some(err),
            GraphError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl_err!(std::io::Error, GraphError, Io);
impl_err!(csv::Error, GraphError, Csv);
