use super::*;
use crate::foundation::error::AnatomyError;

#[test]
fn commit_replaces_the_document() {
    let mut doc = Document::default();
    let mut tx = Transaction::begin(&mut doc);
    tx.staged_mut().time = 3.0;
    assert_eq!(tx.staged().time, 3.0);
    tx.commit();
    assert_eq!(doc.time, 3.0);
}

#[test]
fn dropping_discards_staged_edits() {
    let mut doc = Document::default();
    {
        let mut tx = Transaction::begin(&mut doc);
        tx.staged_mut().time = 3.0;
    }
    assert_eq!(doc.time, 0.0);
}

#[test]
fn transact_rolls_back_on_error() {
    let mut doc = Document::default();
    let err = transact(&mut doc, |d| -> AnatomyResult<()> {
        d.time = 9.0;
        Err(AnatomyError::construction("PP_Grid", "boom"))
    })
    .unwrap_err();
    assert!(matches!(err, AnatomyError::Construction { .. }));
    assert_eq!(doc.time, 0.0);

    let n = transact(&mut doc, |d| {
        d.time = 1.5;
        Ok(7)
    })
    .unwrap();
    assert_eq!((n, doc.time), (7, 1.5));
}

#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn logged(f: impl FnOnce()) -> String {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    out.text()
}

#[test]
fn only_uncommitted_drops_are_logged() {
    let mut doc = Document::default();
    let dropped = logged(|| {
        let mut tx = Transaction::begin(&mut doc);
        tx.staged_mut().time = 3.0;
    });
    assert!(dropped.contains("discarding uncommitted document edit"));
    assert_eq!(doc.time, 0.0);

    let committed = logged(|| {
        let mut tx = Transaction::begin(&mut doc);
        tx.staged_mut().time = 3.0;
        tx.commit();
    });
    assert!(!committed.contains("discarding"));
    assert_eq!(doc.time, 3.0);
}
