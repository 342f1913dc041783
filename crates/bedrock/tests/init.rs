use bedrock::ConfigRegistry;
use bedrock::transport::{TRANSPORT_CONFIG_NAME, TransportConfig};
use serial_test::serial;

#[test]
#[serial]
fn init_registers_builtin_configs_once() {
    let first = bedrock::init().expect("init");
    let second = bedrock::init().expect("second init");

    assert!(first.len() <= 1);
    assert!(second.is_empty());
    assert!(ConfigRegistry::global().contains(TRANSPORT_CONFIG_NAME));

    let transport: TransportConfig =
        ConfigRegistry::global().load(TRANSPORT_CONFIG_NAME, None).expect("load");
    assert_eq!(transport, TransportConfig::default());
}

#[test]
fn core_features_are_always_enabled() {
    for name in ["config", "errors", "ini", "transport"] {
        assert!(bedrock::features::is_enabled(name), "{name}");
    }
    assert!(!bedrock::features::is_enabled("desktop"));
}
