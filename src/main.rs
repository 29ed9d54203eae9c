use rask_pretty_log::app;

fn main() -> anyhow::Result<()> {
    app::main()
}
