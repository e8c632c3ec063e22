use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["ondcbuy"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_cart_list() {
    let cli = Cli::try_parse_from(["ondcbuy", "cart", "list"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::List
        })
    ));
}

#[test]
fn parses_cart_add_with_defaults() {
    let cli = Cli::try_parse_from([
        "ondcbuy", "cart", "add", "--id", "sku-1", "--name", "Rice", "--price", "₹100",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Add {
                ref id,
                quantity: 1,
                cod: false,
                provider: None,
                ..
            }
        }) if id == "sku-1"
    ));
}

#[test]
fn cart_update_accepts_out_of_range_values_for_the_store_to_reject() {
    let cli = Cli::try_parse_from(["ondcbuy", "cart", "update", "sku-1", "-3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Update { quantity: -3, .. }
        })
    ));
}

#[test]
fn parses_cart_inc_and_dec() {
    let inc = Cli::try_parse_from(["ondcbuy", "cart", "inc", "sku-1"]).unwrap();
    assert!(matches!(
        inc.command,
        Some(Commands::Cart {
            command: CartCommands::Inc { .. }
        })
    ));
    let dec = Cli::try_parse_from(["ondcbuy", "cart", "dec", "sku-1"]).unwrap();
    assert!(matches!(
        dec.command,
        Some(Commands::Cart {
            command: CartCommands::Dec { .. }
        })
    ));
}

#[test]
fn parses_select_with_options() {
    let cli = Cli::try_parse_from([
        "ondcbuy",
        "select",
        "sku-1",
        "sku-2",
        "--quantity",
        "2",
        "--option",
        "size=M",
        "-o",
        r#"addon={"gift":true}"#,
    ])
    .unwrap();
    let Some(Commands::Select {
        product_ids,
        quantity,
        options,
    }) = cli.command
    else {
        panic!("expected select command");
    };
    assert_eq!(product_ids, vec!["sku-1", "sku-2"]);
    assert_eq!(quantity, 2);
    assert_eq!(options[0], ("size".to_owned(), serde_json::json!("M")));
    assert_eq!(options[1].1["gift"], true);
}

#[test]
fn select_requires_a_product() {
    assert!(Cli::try_parse_from(["ondcbuy", "select"]).is_err());
}

#[test]
fn select_rejects_quantity_outside_bounds() {
    for bad in ["0", "100", "500"] {
        assert!(Cli::try_parse_from(["ondcbuy", "select", "sku-1", "-q", bad]).is_err());
    }
    let cli = Cli::try_parse_from(["ondcbuy", "select", "sku-1", "-q", "99"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Select { quantity: 99, .. })
    ));
}

#[test]
fn select_rejects_malformed_option() {
    assert!(Cli::try_parse_from(["ondcbuy", "select", "sku-1", "--option", "size"]).is_err());
}

#[test]
fn parses_checkout_no_fallback() {
    let cli = Cli::try_parse_from(["ondcbuy", "checkout", "--no-fallback"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Checkout { no_fallback: true })
    ));
}

#[test]
fn parses_returns_and_track() {
    let cli = Cli::try_parse_from(["ondcbuy", "returns", "list", "--offline"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Returns {
            command: ReturnsCommands::List { offline: true }
        })
    ));
    let cli = Cli::try_parse_from(["ondcbuy", "track", "refresh"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Track {
            command: TrackCommands::Refresh { order_id: None }
        })
    ));
}

#[test]
fn parses_register() {
    let cli = Cli::try_parse_from([
        "ondcbuy",
        "register",
        "--name",
        "Asha",
        "--email",
        "asha@example.com",
        "--phone",
        "9876543210",
        "--password",
        "longenough",
    ])
    .unwrap();
    let Some(Commands::Register(args)) = cli.command else {
        panic!("expected register command");
    };
    assert_eq!(args.email, "asha@example.com");
    assert!(!format!("{args:?}").contains("longenough"));
}

#[test]
fn parses_session_reset_sign_out() {
    let cli = Cli::try_parse_from(["ondcbuy", "session", "reset", "--sign-out"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Session {
            command: SessionCommands::Reset { sign_out: true }
        })
    ));
}

#[test]
fn parse_option_falls_back_to_string() {
    assert_eq!(
        checkout::parse_option("note=hello world").unwrap(),
        ("note".to_owned(), serde_json::json!("hello world"))
    );
    assert_eq!(
        checkout::parse_option("count=3").unwrap(),
        ("count".to_owned(), serde_json::json!(3))
    );
    assert!(checkout::parse_option("=x").is_err());
}

#[test]
fn fmt_money_uses_rupee_and_two_decimals() {
    assert_eq!(fmt_money(Decimal::new(31600, 2)), "\u{20b9}316.00");
    assert_eq!(fmt_money(Decimal::from(40)), "\u{20b9}40.00");
}
