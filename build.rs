fn main() {
    // ESP-IDF link arguments are only needed when building for the target;
    // host builds (tests, fuzzing) skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
