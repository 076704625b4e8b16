use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no usable emission factors were found in the uploaded workbook")]
    EmptyWorkbook,

    #[error("malformed request: missing '{0}'")]
    MalformedRequest(&'static str),
}
