use poem::Request;

use edutrack_backend::types::internal::{AuthenticatedUser, RequestContext, Role};

#[test]
fn test_request_context_for_system() {
    let ctx = RequestContext::for_system("seed");

    assert_eq!(ctx.actor_id, "system:seed");
    assert!(ctx.ip_address.is_none());
    assert!(ctx.user.is_none());
}

#[test]
fn test_request_context_from_anonymous_request() {
    let req = Request::builder().finish();
    let ctx = RequestContext::from_request(&req);

    assert_eq!(ctx.actor_id, "anonymous");
    assert!(ctx.user.is_none());
}

#[test]
fn test_each_request_gets_its_own_id() {
    let req = Request::builder().finish();
    let first = RequestContext::from_request(&req);
    let second = RequestContext::from_request(&req);

    assert_ne!(first.request_id, second.request_id);
}

#[test]
fn test_with_user_carries_role() {
    let ctx = RequestContext::for_system("test").with_user(AuthenticatedUser {
        user_id: "inspector-7".to_string(),
        role: Role::Inspector,
        session_id: "s".to_string(),
    });

    assert_eq!(ctx.actor_id, "inspector-7");
    assert_eq!(ctx.user.map(|u| u.role), Some(Role::Inspector));
}
