fn main() -> anyhow::Result<()> {
    generate_cc_arrays::run()
}
