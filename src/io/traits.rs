//! I/O trait definitions for template loading.
//!
//! Rendering and expansion never touch the file system directly; they read
//! template text through [`TemplateSource`]. Production code uses
//! [`crate::io::real::FileSystemSource`], tests and embedders can use
//! [`crate::io::real::MemorySource`].

use std::io;
use std::path::Path;

/// Read-only access to template text.
///
/// Every call reads afresh; implementations are not expected to cache.
pub trait TemplateSource: Send + Sync {
    /// Read a template's full contents as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the template does not exist or cannot be
    /// read as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}
