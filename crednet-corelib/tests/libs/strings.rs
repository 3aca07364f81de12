use chrono::{TimeZone, Utc};
use laboratory::{SpecContext, expect};

use crednet_corelib::strings;

use crate::TestState;

/// Test [`strings::is_account`].
pub fn is_account(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::is_account("abc-_")).to_equal(true)?;
    expect(strings::is_account("email@example.com")).to_equal(true)?;
    expect(strings::is_account("_abc")).to_equal(false)?;
    expect(strings::is_account("email@example.com@")).to_equal(false)
}

/// Test [`strings::is_scope`].
pub fn is_scope(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::is_scope("profile")).to_equal(true)?;
    expect(strings::is_scope("symbolic_name")).to_equal(true)?;
    expect(strings::is_scope("abc.def")).to_equal(true)?;
    expect(strings::is_scope("abc..abc")).to_equal(false)?;
    expect(strings::is_scope("_abc")).to_equal(false)
}

/// Test [`strings::is_uri`].
pub fn is_uri(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::is_uri("http://localhost/redirect")).to_equal(true)?;
    expect(strings::is_uri(":://")).to_equal(false)
}

/// Test [`strings::is_symbolic_name`].
pub fn is_symbolic_name(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::is_symbolic_name("§(neo_42)")).to_equal(true)?;
    expect(strings::is_symbolic_name("§(a)")).to_equal(false)?;
    expect(strings::is_symbolic_name("neo_42")).to_equal(false)?;
    expect(strings::is_symbolic_name("§(bad name)")).to_equal(false)
}

/// Test [`strings::format_symbolic_name`].
pub fn format_symbolic_name(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::format_symbolic_name("neo")).to_equal("§(neo)".to_string())?;
    expect(strings::format_symbolic_name("§(neo)")).to_equal("§(neo)".to_string())?;
    expect(strings::format_symbolic_name("")).to_equal("§(Anonymous)".to_string())
}

/// Test [`strings::symbolic_name_plain`].
pub fn symbolic_name_plain(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::symbolic_name_plain("§(neo)")).to_equal("neo".to_string())?;
    expect(strings::symbolic_name_plain("§neo")).to_equal("neo".to_string())?;
    expect(strings::symbolic_name_plain("neo")).to_equal("neo".to_string())?;
    expect(strings::symbolic_name_plain("")).to_equal("Anonymous".to_string())
}

/// Test [`strings::password_hash`].
pub fn password_hash(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::password_hash("password", "salt"))
        .to_equal("5ec02b91a4b59c6f59dd5fbe4ca649ece4fa8568cdb8ba36cf41426e8805522b".to_string())
}

/// Test [`strings::random_id`].
pub fn random_id(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    let now = Utc::now();
    expect(strings::random_id(&now, 10)).to_not_equal(strings::random_id(&now, 10))
}

/// Test [`strings::random_id_sha`].
pub fn random_id_sha(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    let now = Utc::now();
    expect(strings::random_id_sha(&now, 10)).to_not_equal(strings::random_id_sha(&now, 10))
}

/// Test [`strings::randomstring`].
pub fn randomstring(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    expect(strings::randomstring(10)).to_not_equal(strings::randomstring(10))?;
    expect(strings::randomstring(24).len()).to_equal(24)
}

/// Test [`strings::time_str`].
pub fn time_str(_context: &mut SpecContext<TestState>) -> Result<(), String> {
    let time = Utc.timestamp_nanos(1629469195228_000000);
    expect(strings::time_str(&time)).to_equal("2021-08-20T14:19:55.228Z".to_string())
}
