use actix_web::{error::UrlencodedError, http::header, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ResponseDto<T: Serialize> {
    pub data: Option<T>,
    pub code: i32,
    pub msg: String,
}

impl<T: Serialize> ResponseDto<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            data,
            code: 0,
            msg: "".to_string(),
        }
    }
}

/// A rendered page: the view model plus its title.
#[derive(Serialize)]
pub struct Page<'a, T: Serialize> {
    pub template: &'a str,
    pub title: &'a str,
    pub view: T,
}

pub fn render<T: Serialize>(template: &str, title: &str, view: T) -> HttpResponse {
    HttpResponse::Ok().json(ResponseDto::success(Some(Page { template, title, view })))
}

/// 303, used after a form POST that should land on a GET.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}

pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish()
}

pub fn form_error_handler(_err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid("form").into()
}

pub fn response_from_error(err: &AppError) -> HttpResponse {
    use actix_web::ResponseError;

    HttpResponse::build(err.status_code())
        .content_type("text/plain; charset=utf-8")
        .body(err.to_string())
}
