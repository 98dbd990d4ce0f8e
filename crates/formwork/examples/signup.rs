//! A signup form driven end to end: rules, field bindings, an async
//! uniqueness check, array fields, and submit.
//!
//! Run with `cargo run --example signup`.

use formwork::{Form, FormConfig, Rule, Rules, SubmitOutcome};
use regex::Regex;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let rules = Rules::new()
        .field(
            "email",
            Rule::new()
                .required("Email required")
                .pattern(Regex::new(r"^\S+@\S+$").expect("static regex")),
        )
        .field("password", Rule::new().required(true).min_length(8))
        .field(
            "confirm",
            Rule::new().equals(("password", "Passwords do not match")),
        )
        .field(
            "username",
            Rule::new().required(true).check_async(|value, _| async move {
                // Stand-in for a uniqueness lookup against a backend.
                value.as_str() != Some("admin")
            }),
        );

    let form = Form::builder(json!({
        "username": "",
        "email": "",
        "password": "",
        "confirm": "",
        "interests": []
    }))
    .rules(rules)
    .config(FormConfig::new().validate_on_blur(true))
    .build();

    // A user fills the form in.
    let email = form.field("email");
    email.set("ada@example.com").await.unwrap();
    email.blur().await;

    form.set_value("username", "ada").await.unwrap();
    form.set_value("password", "correct horse").await.unwrap();
    form.set_value("confirm", "correct horse").await.unwrap();
    form.insert_item("interests", "parsing").await.unwrap();
    form.insert_item("interests", "state machines").await.unwrap();

    let outcome = form
        .submit(|values| async move {
            println!("submitting: {values}");
            Ok::<(), String>(())
        })
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted);

    // A second pass with a reserved username shows the gate.
    form.set_value("username", "admin").await.unwrap();
    let outcome = form
        .submit(|_| async { Ok::<(), String>(()) })
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Invalid);
    println!("username error: {:?}", form.error("username").await);
}
