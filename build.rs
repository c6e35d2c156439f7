fn main() {
    // Only the ESP-IDF build needs the embuild environment; host builds of
    // the library and test suite run without it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
