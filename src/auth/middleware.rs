use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Redirects to /login when the session carries no user. GET requests keep
/// their destination in `next` so the login form can return there.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let has_user = session.get::<i64>("user_id").unwrap_or(None).is_some();

    if !has_user {
        let location = login_location(&req);
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", location))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

fn login_location(req: &ServiceRequest) -> String {
    let path = req.path();
    if req.method() != actix_web::http::Method::GET || path == "/" {
        return "/login".to_string();
    }
    match serde_urlencoded::to_string([("next", path)]) {
        Ok(query) => format!("/login?{query}"),
        Err(_) => "/login".to_string(),
    }
}

/// Only local absolute paths are accepted as a post-login destination.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p,
        _ => "/",
    }
}
