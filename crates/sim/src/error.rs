//! Simulation errors.

use fieldtree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("No free spawn location after {attempts} attempts")]
    FieldFull { attempts: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
