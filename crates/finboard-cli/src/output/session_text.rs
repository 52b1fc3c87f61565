use std::io;

use serde_json::Value;

use super::format::{key_value_rows, str_field};

pub fn render_session(command: &str, data: &Value) -> io::Result<String> {
    let account = data.get("account_number").and_then(Value::as_str);
    let role = data.get("role").and_then(Value::as_str);

    let heading = match command {
        "session set" => "Session saved.",
        "session clear" => {
            if data.get("cleared").and_then(Value::as_bool).unwrap_or(false) {
                "Session cleared."
            } else {
                "No session was stored."
            }
        }
        _ if account.is_none() => "No account is stored yet.",
        _ => "Current session:",
    };

    let mut lines = vec![heading.to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Account:", account.unwrap_or("-").to_string()),
            ("Role:", role.unwrap_or("-").to_string()),
            ("File:", str_field(data, "path")),
        ],
        2,
    ));

    if account.is_none() && command != "session clear" {
        lines.push(String::new());
        lines.push("Run `finboard session set <account-number>` to choose one.".to_string());
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_session;

    #[test]
    fn empty_session_points_at_session_set() {
        let rendered = render_session(
            "session show",
            &json!({"path": "/home/u/.finboard/session.json", "account_number": null, "role": null}),
        );
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No account is stored yet."));
            assert!(text.contains("finboard session set"));
        }
    }

    #[test]
    fn saved_session_lists_account_and_role() {
        let rendered = render_session(
            "session set",
            &json!({"path": "/tmp/s.json", "account_number": "ACC-1", "role": "CUSTOMER"}),
        );
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Session saved."));
            assert!(text.contains("  Account:  ACC-1"));
            assert!(text.contains("  Role:     CUSTOMER"));
        }
    }
}
