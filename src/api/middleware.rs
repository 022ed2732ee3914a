use crate::api::state::AppState;
use crate::config::OwnerScope;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

const USER_HEADER: &str = "x-auth-request-user";
const EMAIL_HEADER: &str = "x-auth-request-email";

/// Owner filter applied to every query of the request. `None` means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOwner(pub Option<String>);

impl RequestOwner {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Resolve the owner filter once per request.
///
/// Authentication itself happens at the ingress (oauth2-proxy), which sets
/// `X-Auth-Request-User`. With the `owner` scope a missing header is a 401;
/// with the `global` scope the header is ignored.
pub async fn identify_owner(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let owner = resolve_owner(state.owner_scope(), request.headers())?;
    request.extensions_mut().insert(owner);
    Ok(next.run(request).await)
}

pub fn resolve_owner(scope: OwnerScope, headers: &HeaderMap) -> Result<RequestOwner, AppError> {
    match scope {
        OwnerScope::Global => Ok(RequestOwner(None)),
        OwnerScope::Owner => {
            let user = header(headers, USER_HEADER).filter(|u| !u.is_empty());
            match user {
                Some(user) => {
                    debug!(
                        "Request owner: {} ({})",
                        user,
                        header(headers, EMAIL_HEADER).unwrap_or("no email")
                    );
                    Ok(RequestOwner(Some(user.to_string())))
                }
                None => Err(AppError::Unauthorized("Missing X-Auth-Request-User header".into())),
            }
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(user: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(user) = user {
            map.insert(USER_HEADER, HeaderValue::from_static(user));
        }
        map
    }

    #[test]
    fn test_owner_scope_uses_header() {
        let owner = resolve_owner(OwnerScope::Owner, &headers(Some("ana"))).unwrap();
        assert_eq!(owner, RequestOwner(Some("ana".into())));
    }

    #[test]
    fn test_owner_scope_rejects_anonymous() {
        assert!(matches!(
            resolve_owner(OwnerScope::Owner, &headers(None)),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            resolve_owner(OwnerScope::Owner, &headers(Some("  "))),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_global_scope_ignores_header() {
        let owner = resolve_owner(OwnerScope::Global, &headers(Some("ana"))).unwrap();
        assert_eq!(owner, RequestOwner(None));
    }
}
