// Sample files are baked into generated tests, so changes to them must trigger a rebuild.
fn main() {
    build_deps::rerun_if_changed_paths("samples/**/*.bst").expect("Sample glob should be valid");
    build_deps::rerun_if_changed_paths("samples/**").expect("Sample glob should be valid");
}
