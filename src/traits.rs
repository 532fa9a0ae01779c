//! Трэйт чтения выписок на основе std::io::BufRead.

use crate::{error::Result, model::Statement};
use std::io::BufRead;

/// Декодер текстового формата выписки. Один вызов на один вход; весь вход
/// материализуется до возврата.
pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Vec<Statement>>;
}
