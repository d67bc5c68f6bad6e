use clap::Parser;
use log::info;

use arbiter::device::Device;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Enable debug logging (traces every predicate operation).
    #[clap(long)]
    debug: bool,

    /// Also print the number of valuations enabling each message.
    #[clap(long)]
    count: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mutex = Device::new("mutex");
    let b = mutex.declare_fsm("bool")?;
    let f = mutex.declare_state(b, "false")?;
    let t = mutex.declare_state(b, "true")?;
    let is_locked = mutex.declare_var("is_locked", b, f)?;

    let lock = mutex.declare_message("lock")?;
    mutex.scoped(lock, |scope| scope.assign(is_locked, t))?;

    let unlock = mutex.declare_message("unlock")?;
    mutex.set_precondition(unlock, mutex.var_eq(is_locked, t)?)?;
    mutex.scoped(unlock, |scope| scope.assign(is_locked, f))?;

    print!("{}", mutex.dump());

    if args.count {
        for msg in mutex.messages() {
            let pre = mutex.precondition(msg).unwrap_or(mutex.constant(true));
            println!("{}: enabled in {} valuation(s)", mutex.message_name(msg), mutex.sat_count(pre));
        }
    }

    info!("cache = {:?}", mutex.cache());

    Ok(())
}
