//! All-or-nothing edits of a [`Document`].

use crate::foundation::error::AnatomyResult;
use crate::scene::document::Document;

/// A staged copy of a document; nothing reaches the original until [`Transaction::commit`].
///
/// Dropping an uncommitted transaction discards every staged change.
pub struct Transaction<'a> {
    target: &'a mut Document,
    staged: Document,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub fn begin(target: &'a mut Document) -> Self {
        let staged = target.clone();
        Self {
            target,
            staged,
            committed: false,
        }
    }

    pub fn staged(&self) -> &Document {
        &self.staged
    }

    pub fn staged_mut(&mut self) -> &mut Document {
        &mut self.staged
    }

    pub fn commit(mut self) {
        std::mem::swap(self.target, &mut self.staged);
        self.committed = true;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("discarding uncommitted document edit");
        }
    }
}

/// Run `f` against a staged copy of `doc` and keep its changes only when it succeeds.
pub fn transact<T>(
    doc: &mut Document,
    f: impl FnOnce(&mut Document) -> AnatomyResult<T>,
) -> AnatomyResult<T> {
    let mut tx = Transaction::begin(doc);
    match f(tx.staged_mut()) {
        Ok(v) => {
            tx.commit();
            Ok(v)
        }
        Err(e) => {
            tracing::debug!(error = %e, "document edit failed");
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transaction.rs"]
mod tests;
