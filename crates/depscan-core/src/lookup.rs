//! Module output path resolution.
//!
//! The caller owns the policy for where module build outputs go and exposes
//! it as a callback. The callback speaks a two-phase fixed-buffer protocol:
//! it writes as much of the path as fits and returns the full length. When
//! the length exceeds the buffer, the buffer is grown to exactly that length
//! and the callback is called a second time.

use rustc_hash::FxHashMap;

use crate::module_id::{ModuleId, ModuleOutputKind};
use crate::{Error, Result};

/// Capacity of the scratch buffer offered on the first lookup call.
pub const INITIAL_LOOKUP_CAPACITY: usize = 256;

/// Caller-supplied output path policy.
pub trait ModuleOutputCallback {
    /// Write the path for `(module_name, context_hash, kind)` into `buffer`
    /// and return its full length, which may exceed `buffer.len()`.
    fn lookup(
        &mut self,
        module_name: &str,
        context_hash: &str,
        kind: ModuleOutputKind,
        buffer: &mut [u8],
    ) -> usize;
}

impl<F> ModuleOutputCallback for F
where
    F: FnMut(&str, &str, ModuleOutputKind, &mut [u8]) -> usize,
{
    fn lookup(
        &mut self,
        module_name: &str,
        context_hash: &str,
        kind: ModuleOutputKind,
        buffer: &mut [u8],
    ) -> usize {
        self(module_name, context_hash, kind, buffer)
    }
}

/// Run the buffer negotiation against `callback` once, uncached.
///
/// Fails when the callback's bytes are not UTF-8; the path is never rewritten.
pub fn lookup_module_output(
    callback: &mut dyn ModuleOutputCallback,
    id: &ModuleId,
    kind: ModuleOutputKind,
) -> Result<String> {
    let mut buffer = vec![0u8; INITIAL_LOOKUP_CAPACITY];
    let mut len = callback.lookup(&id.module_name, &id.context_hash, kind, &mut buffer);
    if len > buffer.len() {
        buffer.resize(len, 0);
        len = callback.lookup(&id.module_name, &id.context_hash, kind, &mut buffer);
        if len > buffer.len() {
            tracing::warn!(
                module = %id,
                %kind,
                requested = len,
                capacity = buffer.len(),
                "module output lookup over-reported after resize; truncating"
            );
            len = buffer.len();
        }
    }
    buffer.truncate(len);
    tracing::trace!(module = %id, %kind, len, "resolved module output");

    String::from_utf8(buffer).map_err(|err| Error::NonUtf8OutputPath {
        module: id.clone(),
        kind,
        path: String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Per-query output resolver.
///
/// Module file paths are requested over and over during one scan (once per
/// dependent, once per sibling reference), so they are memoized by module
/// id. Every other kind goes straight to the callback.
///
/// The engine-facing lookup cannot fail, so a failed lookup yields an empty
/// path and is kept until [`OutputLookup::take_error`] collects it.
pub struct OutputLookup<'a> {
    pcm_paths: FxHashMap<ModuleId, String>,
    callback: &'a mut dyn ModuleOutputCallback,
    error: Option<Error>,
}

impl<'a> OutputLookup<'a> {
    pub fn new(callback: &'a mut dyn ModuleOutputCallback) -> Self {
        Self {
            pcm_paths: FxHashMap::default(),
            callback,
            error: None,
        }
    }

    pub fn lookup_module_output(&mut self, id: &ModuleId, kind: ModuleOutputKind) -> String {
        let cacheable = kind == ModuleOutputKind::ModuleFile;
        if cacheable {
            if let Some(path) = self.pcm_paths.get(id) {
                return path.clone();
            }
        }
        match lookup_module_output(&mut *self.callback, id, kind) {
            Ok(path) => {
                if cacheable {
                    self.pcm_paths.insert(id.clone(), path.clone());
                }
                path
            }
            Err(err) => {
                tracing::warn!(error = %err, "module output lookup failed");
                self.error.get_or_insert(err);
                String::new()
            }
        }
    }

    /// Number of module file paths memoized so far.
    pub fn cached_len(&self) -> usize {
        self.pcm_paths.len()
    }

    /// First lookup failure of this query, if any.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Callback that answers with a fixed path and records every call.
    fn recording(
        path: String,
        calls: &mut Vec<(String, ModuleOutputKind, usize)>,
    ) -> impl FnMut(&str, &str, ModuleOutputKind, &mut [u8]) -> usize + '_ {
        move |name, _hash, kind, buf| {
            calls.push((name.to_string(), kind, buf.len()));
            let bytes = path.as_bytes();
            let n = bytes.len().min(buf.len());
            buf[..n].copy_from_slice(&bytes[..n]);
            bytes.len()
        }
    }

    #[test]
    fn test_module_file_is_cached() {
        let mut calls = Vec::new();
        let mut cb = recording("/cache/M-H1.pcm".to_string(), &mut calls);
        let mut lookup = OutputLookup::new(&mut cb);
        let id = ModuleId::new("M", "H1");

        let first = lookup.lookup_module_output(&id, ModuleOutputKind::ModuleFile);
        let second = lookup.lookup_module_output(&id, ModuleOutputKind::ModuleFile);
        assert_eq!(first, "/cache/M-H1.pcm");
        assert_eq!(first, second);
        assert_eq!(lookup.cached_len(), 1);
        drop(lookup);
        drop(cb);

        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_other_kinds_are_not_cached() {
        let mut calls = Vec::new();
        let mut cb = recording("/cache/M.d".to_string(), &mut calls);
        let mut lookup = OutputLookup::new(&mut cb);
        let id = ModuleId::new("M", "H1");

        lookup.lookup_module_output(&id, ModuleOutputKind::DependencyFile);
        lookup.lookup_module_output(&id, ModuleOutputKind::DependencyFile);
        lookup.lookup_module_output(&id, ModuleOutputKind::DiagnosticSerializationFile);
        assert_eq!(lookup.cached_len(), 0);
        drop(lookup);
        drop(cb);

        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_distinct_hashes_resolve_separately() {
        let mut calls = Vec::new();
        let mut cb = recording("/cache/x.pcm".to_string(), &mut calls);
        let mut lookup = OutputLookup::new(&mut cb);

        lookup.lookup_module_output(&ModuleId::new("M", "H1"), ModuleOutputKind::ModuleFile);
        lookup.lookup_module_output(&ModuleId::new("M", "H2"), ModuleOutputKind::ModuleFile);
        assert_eq!(lookup.cached_len(), 2);
        drop(lookup);
        drop(cb);

        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_long_path_triggers_second_call_with_exact_capacity() {
        let long = format!("/very/{}/M.pcm", "deep/".repeat(100));
        let mut calls = Vec::new();
        let mut cb = recording(long.clone(), &mut calls);

        let path = lookup_module_output(
            &mut cb,
            &ModuleId::new("M", "H1"),
            ModuleOutputKind::ModuleFile,
        )
        .unwrap();
        drop(cb);

        assert_eq!(path, long);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].2, INITIAL_LOOKUP_CAPACITY);
        assert_eq!(calls[1].2, long.len());
    }

    #[test]
    fn test_short_path_uses_single_call() {
        let mut calls = Vec::new();
        let mut cb = recording("m.pcm".to_string(), &mut calls);
        let path = lookup_module_output(
            &mut cb,
            &ModuleId::new("M", "H1"),
            ModuleOutputKind::ModuleFile,
        )
        .unwrap();
        drop(cb);

        assert_eq!(path, "m.pcm");
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_over_reporting_callback_is_truncated() {
        let mut cb = |_: &str, _: &str, _: ModuleOutputKind, buf: &mut [u8]| {
            buf.fill(b'x');
            buf.len() + 1
        };
        let path = lookup_module_output(
            &mut cb,
            &ModuleId::new("M", "H1"),
            ModuleOutputKind::ModuleFile,
        )
        .unwrap();
        assert_eq!(path.len(), INITIAL_LOOKUP_CAPACITY + 1);
    }

    #[test]
    fn test_non_utf8_path_is_rejected_not_rewritten() {
        let raw: &[u8] = b"/cache/\xe9\xe9.pcm";
        let mut cb = |_: &str, _: &str, _: ModuleOutputKind, buf: &mut [u8]| {
            buf[..raw.len()].copy_from_slice(raw);
            raw.len()
        };

        let err = lookup_module_output(
            &mut cb,
            &ModuleId::new("M", "H1"),
            ModuleOutputKind::ModuleFile,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::NonUtf8OutputPath { kind: ModuleOutputKind::ModuleFile, .. }
        ));
        assert!(err.to_string().contains("M:H1"));
    }

    #[test]
    fn test_failed_lookup_is_recorded_and_not_cached() {
        let mut calls = 0;
        let mut cb = |_: &str, _: &str, _: ModuleOutputKind, buf: &mut [u8]| {
            calls += 1;
            buf[0] = 0xff;
            1
        };
        let mut lookup = OutputLookup::new(&mut cb);
        let id = ModuleId::new("M", "H1");

        assert_eq!(lookup.lookup_module_output(&id, ModuleOutputKind::ModuleFile), "");
        assert_eq!(lookup.lookup_module_output(&id, ModuleOutputKind::ModuleFile), "");
        assert_eq!(lookup.cached_len(), 0);
        assert!(matches!(lookup.take_error(), Some(Error::NonUtf8OutputPath { .. })));
        assert!(lookup.take_error().is_none());
        drop(lookup);
        drop(cb);

        assert_eq!(calls, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// Property: the resolved string always has exactly the reported length.
        #[test]
        fn prop_negotiated_length_is_exact(len in 0usize..2048) {
            let expected = "p".repeat(len);
            let mut capacities = Vec::new();
            let mut cb = |_: &str, _: &str, _: ModuleOutputKind, buf: &mut [u8]| {
                capacities.push(buf.len());
                let n = len.min(buf.len());
                buf[..n].copy_from_slice(&expected.as_bytes()[..n]);
                len
            };

            let path = lookup_module_output(
                &mut cb,
                &ModuleId::new("M", "H"),
                ModuleOutputKind::ModuleFile,
            )
            .unwrap();
            prop_assert_eq!(path.len(), len);
            prop_assert_eq!(capacities[0], INITIAL_LOOKUP_CAPACITY);
            if len > INITIAL_LOOKUP_CAPACITY {
                prop_assert_eq!(capacities.len(), 2);
                prop_assert!(capacities[1] >= len);
            } else {
                prop_assert_eq!(capacities.len(), 1);
            }
        }
    }
}
