use axum::{http::StatusCode, response::IntoResponse};
use laboratory::{SpecContext, expect};

use crednet_corelib::err::{self, ErrResp};

use crate::TestState;

/// Test [`err::to_json`].
pub fn to_json(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(err::to_json(err::E_PARAM, None)).to_equal("{\"code\":\"err_param\"}".to_string())?;
    expect(err::to_json(err::E_PARAM, Some("message")))
        .to_equal("{\"code\":\"err_param\",\"message\":\"message\"}".to_string())
}

/// Test `ErrResp::fmt`.
pub fn fmt(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(format!("{}", ErrResp::ErrAuth(None))).to_equal("{\"code\":\"err_auth\"}".to_string())?;
    expect(format!("{}", ErrResp::ErrDb(Some("db".to_string()))))
        .to_equal("{\"code\":\"err_db\",\"message\":\"db\"}".to_string())?;
    expect(format!("{}", ErrResp::Custom(400, "err_custom", None)))
        .to_equal("{\"code\":\"err_custom\"}".to_string())
}

/// Test `ErrResp::into_response`.
pub fn into_response(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(ErrResp::ErrAuth(None).into_response().status()).to_equal(StatusCode::UNAUTHORIZED)?;
    expect(ErrResp::ErrDb(None).into_response().status())
        .to_equal(StatusCode::SERVICE_UNAVAILABLE)?;
    expect(ErrResp::ErrNotFound(None).into_response().status()).to_equal(StatusCode::NOT_FOUND)?;
    expect(ErrResp::ErrParam(None).into_response().status()).to_equal(StatusCode::BAD_REQUEST)?;
    expect(ErrResp::ErrPerm(None).into_response().status()).to_equal(StatusCode::FORBIDDEN)?;
    expect(ErrResp::ErrUnknown(None).into_response().status())
        .to_equal(StatusCode::INTERNAL_SERVER_ERROR)?;
    expect(
        ErrResp::Custom(503, "err_custom", None)
            .into_response()
            .status(),
    )
    .to_equal(StatusCode::SERVICE_UNAVAILABLE)
}
