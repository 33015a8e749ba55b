#[cfg(test)]
mod error_handling_tests {
    use actix_web::HttpResponse;
    use invoice_pdf_server::invoice::multipart_parser::MultipartParseError;
    use invoice_pdf_server::ErrorResponse;

    #[test]
    fn test_error_response_struct() {
        let error_response = ErrorResponse::new("TestError", "Test message");
        assert_eq!(error_response.error, "TestError");
        assert_eq!(error_response.message, "Test message");
        assert!(!error_response.timestamp.is_empty());
    }

    #[test]
    fn test_error_response_constructors() {
        assert_eq!(ErrorResponse::not_found("x").error, "NotFound");
        assert_eq!(ErrorResponse::bad_request("x").error, "BadRequest");
        assert_eq!(ErrorResponse::payload_too_large("x").error, "PayloadTooLarge");
        assert_eq!(ErrorResponse::internal_error("x").error, "InternalServerError");
    }

    #[test]
    fn test_error_response_serialization() {
        let error_response = ErrorResponse::internal_error("Failed to render invoice");
        let json = serde_json::to_value(&error_response).unwrap();

        assert_eq!(json["error"], "InternalServerError");
        assert_eq!(json["message"], "Failed to render invoice");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_multipart_errors_map_to_status_codes() {
        let too_large = HttpResponse::from(MultipartParseError::PayloadTooLarge { limit: 16 });
        assert_eq!(too_large.status().as_u16(), 413);

        let malformed = HttpResponse::from(MultipartParseError::FieldError("boom".to_string()));
        assert_eq!(malformed.status().as_u16(), 400);

        let bad_text = HttpResponse::from(MultipartParseError::Utf8Error {
            field: "client_name".to_string(),
            message: "invalid utf-8".to_string(),
        });
        assert_eq!(bad_text.status().as_u16(), 400);
    }
}
