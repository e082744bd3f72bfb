fn main() {
    uniffi::generate_scaffolding("src/aquamonitor.udl").expect("failed to generate uniffi scaffolding");
}
