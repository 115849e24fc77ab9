//! Generic load/save of one collection per file.
//!
//! [`RecordStore::load`] never fails: a missing file is an empty collection, and
//! an unreadable or unparsable file is reported to the [`ErrorReporter`] and then
//! also treated as an empty collection. [`RecordStore::save`] reports failures and
//! returns them, leaving the previous file untouched (backends write atomically).

use crate::error::{QuizError, Result};
use crate::error_reports::{ErrorKind, ErrorReporter};
use crate::store::backend::StorageBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::rc::Rc;

/// Text format of a stored collection.
pub trait RecordCodec {
    type Collection: Default;

    /// Kind recorded in error reports when decoding fails.
    const ERROR_KIND: ErrorKind;

    fn decode(text: &str) -> Result<Self::Collection>;

    fn encode(collection: &Self::Collection) -> Result<String>;
}

/// Pretty-printed JSON via serde. A document missing a required field of `T`
/// is a decode error, not an empty collection.
pub struct Json<T>(PhantomData<T>);

impl<T> RecordCodec for Json<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    type Collection = T;

    const ERROR_KIND: ErrorKind = ErrorKind::JsonParse;

    fn decode(text: &str) -> Result<T> {
        Ok(serde_json::from_str(text)?)
    }

    fn encode(collection: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(collection)?)
    }
}

pub struct RecordStore<B: StorageBackend> {
    backend: Rc<B>,
    errors: Rc<ErrorReporter<B>>,
}

impl<B: StorageBackend> Clone for RecordStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            errors: Rc::clone(&self.errors),
        }
    }
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: Rc<B>, errors: Rc<ErrorReporter<B>>) -> Self {
        Self { backend, errors }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn errors(&self) -> &ErrorReporter<B> {
        &self.errors
    }

    /// Read and decode without any recovery. Ok(None) when the file is absent.
    pub fn try_load<C: RecordCodec>(&self, rel: &str) -> Result<Option<C::Collection>> {
        match self.backend.read_text(rel)? {
            Some(text) => C::decode(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Load `rel`, falling back to an empty collection.
    pub fn load<C: RecordCodec>(&self, rel: &str) -> C::Collection {
        match self.try_load::<C>(rel) {
            Ok(Some(collection)) => {
                tracing::debug!(file = rel, "loaded records");
                collection
            }
            Ok(None) => {
                tracing::debug!(file = rel, "no file yet, starting empty");
                C::Collection::default()
            }
            Err(err) => {
                tracing::warn!(file = rel, %err, "unreadable records, starting empty");
                self.report_load_failure(C::ERROR_KIND, rel, &err);
                C::Collection::default()
            }
        }
    }

    /// Encode and write `collection` to `rel`.
    pub fn save<C: RecordCodec>(&self, rel: &str, collection: &C::Collection) -> Result<()> {
        let written = C::encode(collection).and_then(|text| self.backend.write_text(rel, &text));
        match written {
            Ok(()) => {
                tracing::debug!(file = rel, "saved records");
                Ok(())
            }
            Err(err) => {
                tracing::error!(file = rel, %err, "failed to save records");
                let path = self.backend.full_path(rel);
                let err = QuizError::Write {
                    path,
                    source: Box::new(err),
                };
                self.errors
                    .report_general_error(rel, "Could not save the file", Some(&err));
                Err(err)
            }
        }
    }

    fn report_load_failure(&self, kind: ErrorKind, rel: &str, err: &QuizError) {
        let description = "Could not read or parse the file. An empty one will be used.";
        match kind {
            ErrorKind::JsonParse => self.errors.report_json_error(rel, description, Some(err)),
            ErrorKind::XmlParse => self.errors.report_xml_error(rel, description, Some(err)),
            ErrorKind::General => self.errors.report_general_error(rel, description, Some(err)),
        };
    }
}
