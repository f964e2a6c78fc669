//! Cookie session access for handlers.
//!
//! [`SessionContext`] is the only code that reads or writes session keys. A
//! session holds one [`Principal`]: the identity id and the role it logged
//! in as.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, IdentityId, Principal, Role};

pub(crate) const IDENTITY_KEY: &str = "identity_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Extractor wrapping the actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `principal`, issuing a fresh session id.
    pub fn establish(&self, principal: Principal) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, principal.identity_id())
            .and_then(|()| self.0.insert(ROLE_KEY, principal.role()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every session value and expire the cookie.
    pub fn terminate(&self) {
        self.0.purge();
    }

    /// Principal stored in the session, if any.
    ///
    /// Undecodable contents are logged and treated as no session.
    pub fn principal(&self) -> Option<Principal> {
        let identity = self.0.get::<IdentityId>(IDENTITY_KEY);
        let role = self.0.get::<Role>(ROLE_KEY);
        match (identity, role) {
            (Ok(Some(identity)), Ok(Some(role))) => Some(Principal::new(identity, role)),
            (Ok(None), Ok(None)) => None,
            (identity, role) => {
                warn!(
                    identity_ok = matches!(identity, Ok(Some(_))),
                    role_ok = matches!(role, Ok(Some(_))),
                    "ignoring malformed session contents"
                );
                None
            }
        }
    }

    /// Principal or `401 login required`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use uuid::Uuid;

    const IDENTITY: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn identity() -> IdentityId {
        IdentityId::from_uuid(Uuid::parse_str(IDENTITY).expect("fixture uuid"))
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route(
                        "/establish",
                        web::get().to(|session: SessionContext| async move {
                            session.establish(Principal::new(identity(), Role::Doctor))?;
                            Ok::<_, Error>(HttpResponse::Ok().finish())
                        }),
                    )
                    .route(
                        "/whoami",
                        web::get().to(|session: SessionContext| async move {
                            let principal = session.require_principal()?;
                            Ok::<_, Error>(HttpResponse::Ok().body(format!(
                                "{}:{}",
                                principal.identity_id(),
                                principal.role()
                            )))
                        }),
                    )
                    .route(
                        "/terminate",
                        web::get().to(|session: SessionContext| async move {
                            session.terminate();
                            HttpResponse::Ok().finish()
                        }),
                    )
                    .route(
                        "/tamper",
                        web::get().to(|session: Session| async move {
                            session.insert(IDENTITY_KEY, "not-a-uuid").expect("insert");
                            session.insert(ROLE_KEY, "doctor").expect("insert");
                            HttpResponse::Ok().finish()
                        }),
                    ),
            )
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn established_principals_round_trip() {
        let app = session_app!().await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/establish").to_request())
            .await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{IDENTITY}:doctor"));
    }

    #[rstest]
    #[actix_web::test]
    async fn requests_without_a_session_are_unauthorised() {
        let app = session_app!().await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_session_contents_are_unauthorised() {
        let app = session_app!().await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn terminated_sessions_expire_the_cookie() {
        let app = session_app!().await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/establish").to_request())
            .await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/terminate")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = session_cookie(&res).expect("removal cookie");
        assert_eq!(removal.value(), "");
    }
}
