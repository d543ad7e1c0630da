//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures become `ServiceUnavailable`; failures while executing
//! a statement become `InternalError`. Nothing is retried here.

use crate::domain::Error;
use crate::domain::ports::{
    ElementRepositoryError, FileMetadataRepositoryError, ObservationRepositoryError,
};

pub(crate) fn map_observation_error(error: ObservationRepositoryError) -> Error {
    match error {
        ObservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("observation store unavailable: {message}"))
        }
        ObservationRepositoryError::Query { message } => {
            Error::internal(format!("observation store error: {message}"))
        }
    }
}

pub(crate) fn map_file_metadata_error(error: FileMetadataRepositoryError) -> Error {
    match error {
        FileMetadataRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("metadata store unavailable: {message}"))
        }
        FileMetadataRepositoryError::Query { message } => {
            Error::internal(format!("metadata store error: {message}"))
        }
    }
}

pub(crate) fn map_element_error(error: ElementRepositoryError) -> Error {
    match error {
        ElementRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("element repository unavailable: {message}"))
        }
        ElementRepositoryError::Query { message } => {
            Error::internal(format!("element repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(ObservationRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(ObservationRepositoryError::query("syntax"), ErrorCode::InternalError)]
    fn observation_errors_map_by_kind(
        #[case] error: ObservationRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_observation_error(error).code(), expected);
    }

    #[rstest]
    #[case(FileMetadataRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(FileMetadataRepositoryError::query("syntax"), ErrorCode::InternalError)]
    fn metadata_errors_map_by_kind(
        #[case] error: FileMetadataRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_file_metadata_error(error).code(), expected);
    }

    #[rstest]
    fn element_connection_error_keeps_message() {
        let error = map_element_error(ElementRepositoryError::connection("pool timed out"));
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert!(error.message().contains("pool timed out"));
    }
}
