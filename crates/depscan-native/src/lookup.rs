//! Adapter from the C lookup callback to [`ModuleOutputCallback`].

use std::ffi::{c_char, c_void};

use depscan_core::{ModuleOutputCallback, ModuleOutputKind};

use crate::string::to_cstring;
use crate::types::LookupModuleOutputCallback;

pub(crate) struct CallbackLookup {
    context: *mut c_void,
    callback: LookupModuleOutputCallback,
}

impl CallbackLookup {
    pub(crate) fn new(context: *mut c_void, callback: LookupModuleOutputCallback) -> Self {
        Self { context, callback }
    }
}

impl ModuleOutputCallback for CallbackLookup {
    fn lookup(
        &mut self,
        module_name: &str,
        context_hash: &str,
        kind: ModuleOutputKind,
        buffer: &mut [u8],
    ) -> usize {
        let Some(callback) = self.callback else {
            tracing::warn!(
                module_name,
                %kind,
                "no module output lookup callback; using empty path"
            );
            return 0;
        };
        let name = to_cstring(module_name);
        let hash = to_cstring(context_hash);
        // SAFETY: the buffer is valid for `buffer.len()` bytes and both
        // strings outlive the call.
        unsafe {
            callback(
                self.context,
                name.as_ptr(),
                hash.as_ptr(),
                kind.into(),
                buffer.as_mut_ptr() as *mut c_char,
                buffer.len(),
            )
        }
    }
}
