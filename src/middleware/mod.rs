use crate::error::ApiError;
use crate::helper::session_helpers::{SessionError, SessionIssuer};
use crate::models::account_models::Account;
use crate::models::db_operations::accounts_db_operations as accounts_db;
use crate::models::Role;
use crate::DbPool;
use actix_web::{
    body::EitherBody,
    dev::{self, forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use serde::Serialize;
use std::future::{ready, Ready as StdReady};
use std::rc::Rc;

/// What a route requires of the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any active account.
    Authenticated,
    /// Create, update and delete site content.
    EditContent,
    /// Raw collection browsing and deletion.
    BrowseCollections,
    /// Account administration.
    ManageUsers,
}

impl Capability {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Capability::Authenticated => true,
            Capability::EditContent | Capability::BrowseCollections => role.tier() >= Role::Editor.tier(),
            Capability::ManageUsers => role == Role::SuperAdmin,
        }
    }
}

/// The caller, resolved against the credential store on every request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedAccount {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedAccount {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

impl FromRequest for AuthenticatedAccount {
    type Error = actix_web::Error;
    type Future = StdReady<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedAccount>() {
            Some(account) => ready(Ok(account.clone())),
            None => ready(Err(ApiError::Unauthorized("Not authenticated".into()).into())),
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Token -> live account -> capability check. The account lookup runs on
/// the blocking pool.
async fn resolve_caller(req: &ServiceRequest, capability: Capability) -> Result<AuthenticatedAccount, ApiError> {
    let issuer = req
        .app_data::<web::Data<SessionIssuer>>()
        .ok_or_else(|| ApiError::internal("Authorization unavailable", "session issuer not registered"))?;
    let pool = req
        .app_data::<web::Data<DbPool>>()
        .ok_or_else(|| ApiError::internal("Authorization unavailable", "account pool not registered"))?
        .clone();

    let token = bearer_token(req).ok_or_else(|| ApiError::Unauthorized("Not authenticated".into()))?;
    let claims = issuer.validate_token(token)?;

    let account_id = claims.uid.clone();
    let account = web::block(move || -> Result<Option<Account>, SessionError> {
        let conn = pool.get()?;
        Ok(accounts_db::read_account_by_id(&conn, &account_id)?)
    })
    .await
    .map_err(|e| ApiError::internal("Authorization unavailable", e))?
    .map_err(|e| ApiError::internal("Authorization unavailable", e))?
    .filter(|account| account.is_active && account.username == claims.sub)
    .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".into()))?;

    if !capability.allows(account.role) {
        log::warn!(
            "Account '{}' ({}) denied {:?} on {} {}",
            account.username,
            account.role,
            capability,
            req.method(),
            req.path()
        );
        return Err(ApiError::Forbidden("Not enough permissions".into()));
    }

    Ok(AuthenticatedAccount {
        id: account.id,
        username: account.username,
        role: account.role,
    })
}

/// Rejects requests whose caller lacks `capability`; otherwise makes the
/// caller available to handlers as [`AuthenticatedAccount`].
pub struct RequireCapability {
    capability: Capability,
}

impl RequireCapability {
    pub fn new(capability: Capability) -> Self {
        RequireCapability { capability }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCapability
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCapabilityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequireCapabilityMiddleware {
            service: Rc::new(service),
            capability: self.capability,
        })
    }
}

pub struct RequireCapabilityMiddleware<S> {
    service: Rc<S>,
    capability: Capability,
}

impl<S, B> Service<ServiceRequest> for RequireCapabilityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let capability = self.capability;

        Box::pin(async move {
            match resolve_caller(&req, capability).await {
                Ok(account) => {
                    req.extensions_mut().insert(account);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_matrix() {
        use Capability::*;
        assert!(Authenticated.allows(Role::Viewer));
        assert!(!EditContent.allows(Role::Viewer));
        assert!(EditContent.allows(Role::Editor));
        assert!(EditContent.allows(Role::Admin));
        assert!(BrowseCollections.allows(Role::SuperAdmin));
        assert!(!ManageUsers.allows(Role::Admin));
        assert!(ManageUsers.allows(Role::SuperAdmin));
    }
}
