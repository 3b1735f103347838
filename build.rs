fn main() {
    // Build scripts see enabled features as environment variables, not as
    // cfg flags.  ESP-IDF link arguments are only emitted for target builds.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
