use super::*;

/// Tests the CSRF token can be taken exactly once.
///
/// Expected: Some(token) on the first take, None afterwards
#[tokio::test]
async fn csrf_token_is_single_use() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let csrf = CsrfSession::new(session);
    csrf.set_token("state-token".to_string()).await?;

    assert_eq!(csrf.take_token().await?, Some("state-token".to_string()));
    assert_eq!(csrf.take_token().await?, None);

    Ok(())
}

/// Tests the admin flag defaults to false and is consumed on read.
///
/// Expected: false before set, true once after set, false again
#[tokio::test]
async fn admin_flag_is_consumed() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let flow = OAuthFlowSession::new(session);
    assert!(!flow.take_admin_flag().await?);

    flow.set_admin_flag(true).await?;
    assert!(flow.take_admin_flag().await?);
    assert!(!flow.take_admin_flag().await?);

    Ok(())
}

/// Tests logging out removes the user id.
///
/// Expected: is_authenticated flips from true to false
#[tokio::test]
async fn clear_logs_out() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let auth = AuthSession::new(session);
    auth.set_user_id(7).await?;
    assert!(auth.is_authenticated().await?);
    assert_eq!(auth.get_user_id().await?, Some(7));

    auth.clear().await?;
    assert!(!auth.is_authenticated().await?);

    Ok(())
}
