pub mod document;
pub mod outline;
#[cfg(test)]
pub(crate) mod testdoc;

pub use document::PdfDocument;
