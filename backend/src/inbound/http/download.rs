//! Attachment responses for listing takeovers.

use actix_web::HttpResponse;
use actix_web::http::header;

use crate::domain::Attachment;

use super::cache_control::DOWNLOAD_MUST_REVALIDATE;

/// `200` response whose body is exactly the attachment bytes.
pub fn attachment_response(attachment: Attachment) -> HttpResponse {
    let disposition = attachment.content_disposition();
    let length = attachment.content_length();
    HttpResponse::Ok()
        .insert_header(("Content-Description", "File Transfer"))
        .insert_header((header::CONTENT_TYPE, attachment.content_type()))
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .insert_header(("Content-Transfer-Encoding", "binary"))
        .insert_header((header::EXPIRES, "0"))
        .insert_header((header::CACHE_CONTROL, DOWNLOAD_MUST_REVALIDATE))
        .insert_header((header::PRAGMA, "public"))
        .insert_header((header::CONTENT_LENGTH, length))
        .body(attachment.into_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    fn header_value<'a>(res: &'a HttpResponse, name: &str) -> Option<&'a str> {
        res.headers().get(name).and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case("Content-Description", "File Transfer")]
    #[case("Content-Type", "text/csv")]
    #[case(
        "Content-Disposition",
        r#"attachment; filename="users_export_2019-12-11_09-30-00.csv""#
    )]
    #[case("Content-Transfer-Encoding", "binary")]
    #[case("Expires", "0")]
    #[case("Cache-Control", "must-revalidate, post-check=0, pre-check=0")]
    #[case("Pragma", "public")]
    #[case("Content-Length", "6")]
    fn sets_download_headers(#[case] name: &str, #[case] expected: &str) {
        let res = attachment_response(Attachment::new(
            "users_export_2019-12-11_09-30-00.csv",
            "text/csv",
            b"a,b\n1\n".to_vec(),
        ));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header_value(&res, name), Some(expected));
    }

    #[actix_web::test]
    async fn body_is_the_file_content() {
        let res = attachment_response(Attachment::new("x.csv", "text/csv", b"h\n".to_vec()));
        let body = to_bytes(res.into_body()).await.expect("body");
        assert_eq!(body.as_ref(), b"h\n");
    }
}
