// src/middleware/club_admin.rs
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorForbidden,
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::middleware::auth::validate_jwt_from_request;
use crate::models::user::UserRole;

/// Gates the club back-office routes: manual reservations, settings, the
/// staff grid. Only `admin_club` identities pass.
pub struct ClubAdminMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ClubAdminMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClubAdminMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClubAdminMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct ClubAdminMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ClubAdminMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let claims = match validate_jwt_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        match claims.rol {
            UserRole::AdminClub => {}
            _ => {
                tracing::warn!(
                    "Non-staff user attempted club access: {} (role: {:?})",
                    claims.nombre,
                    claims.rol
                );
                return Box::pin(async move { Err(ErrorForbidden("Club staff only")) });
            }
        }

        req.extensions_mut().insert(claims);

        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
