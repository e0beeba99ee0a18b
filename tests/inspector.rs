//! Inspector output for issued tokens

use jwtsmith::*;

const EXPIRY: i64 = 1_893_456_000; // 2030-01-01T00:00:00Z

fn issue() -> String {
    let pair = KeyGenerator::rsa(2048).unwrap().generate().unwrap();
    TokenBuilder::new()
        .issuer("ETELLER")
        .subject("ETELLER")
        .audience(["SalesPlatformCampaigns", "Billing"])
        .expires_at(EXPIRY)
        .issued_at(EXPIRY - 86_400)
        .claim("ctry", "HU")
        .issue(&TokenIssuer::new(pair).with_algorithm(AlgorithmId::RS512))
        .unwrap()
}

#[test]
fn test_summary_matches_signed_fields() {
    let summary = inspect(&issue()).unwrap();

    assert_eq!(summary.algorithm, "RS512");
    assert_eq!(summary.token_type.as_deref(), Some("JWT"));
    assert_eq!(summary.issuer.as_deref(), Some("ETELLER"));
    assert_eq!(summary.subject.as_deref(), Some("ETELLER"));
    assert_eq!(summary.audience, vec!["SalesPlatformCampaigns", "Billing"]);
    assert_eq!(summary.expires_at, Some(EXPIRY));
    assert_eq!(summary.issued_at, Some(EXPIRY - 86_400));
    assert_eq!(
        summary.expires_at_rfc3339().as_deref(),
        Some("2030-01-01T00:00:00+00:00")
    );
    assert_eq!(summary.claims.get("ctry").map(String::as_str), Some("HU"));
}

#[test]
fn test_summary_display() {
    let rendered = inspect(&issue()).unwrap().to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "JWT token header");
    assert_eq!(lines[1], "  algorithm (alg) : RS512");
    assert_eq!(lines[2], "  type (typ)      : JWT");
    assert_eq!(lines[3], "JWT token payload");
    assert_eq!(lines[4], "  issuer (iss)    : ETELLER");
    assert_eq!(lines[5], "  subject (sub)   : ETELLER");
    assert_eq!(lines[6], "  audience (aud)  : [SalesPlatformCampaigns, Billing]");
    assert_eq!(
        lines[7],
        "  expires (exp)   : 1893456000 (2030-01-01T00:00:00+00:00)"
    );
    assert_eq!(
        lines[8],
        "  issued (iat)    : 1893369600 (2029-12-31T00:00:00+00:00)"
    );
    assert_eq!(lines[9], "  ctry            : HU");
}

#[test]
fn test_structure_check_uses_first_audience() {
    let token = issue();
    let now = EXPIRY - 3600;

    let sales = Expectations::new("eteller", "ETELLER")
        .audience(["salesplatformcampaigns"])
        .claim("ctry", "");
    assert!(check_payload_structure(&token, &sales, now).unwrap());

    let billing = Expectations::new("ETELLER", "ETELLER").audience(["Billing"]);
    assert!(!check_payload_structure(&token, &billing, now).unwrap());
}
