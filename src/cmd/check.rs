//! A subcommand making sure various things are working. Useful after changing
//! the configuration, to catch errors before running anything else.

use crate::{
    args,
    config::Config,
    db,
    load_config_and_init_logger,
    prelude::*,
};


pub(crate) async fn run(shared: &args::Shared, args: &args::Args) -> Result<()> {
    let config = load_config_and_init_logger(shared, args)
        .context("failed to load config: cannot proceed with `check` command")?;


    // Perform main checks
    info!("Starting to verify various things...");
    let (store, collections) = check_store(&config).await;
    info!("Done verifying various things");


    // Print summary after all log output
    let mut any_errors = false;
    println!();
    bunt::println!("{$bold+blue+intense}Summary{/$}");
    println!();
    print_outcome(&mut any_errors, "Load configuration", &Ok(()));
    print_outcome(&mut any_errors, "Connection to store", &store);
    print_outcome(&mut any_errors, "Collections exist", &collections);
    if let Ok(created) = &collections {
        if !created.is_empty() {
            bunt::println!("      {$dimmed}(created: {}){/$}", created.join(", "));
        }
    }

    println!();
    if any_errors {
        bunt::println!("{$red+intense}➡  Errors have occured!{/$}");
        std::process::exit(1);
    } else {
        bunt::println!("{$green+intense}⮕  Everything OK{/$}");
        Ok(())
    }
}

fn print_outcome<T>(any_errors: &mut bool, label: &str, result: &Result<T>) {
    match result {
        Ok(_) => {
            bunt::println!(" ▸ {[bold+intense]}  {$green+bold}✔ ok{/$}", label);
        }
        Err(e) => {
            *any_errors = true;
            bunt::println!(" ▸ {[bold+intense]}  {$red+bold}✘ error{/$}", label);
            bunt::println!("      {$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
            println!();
            bunt::println!("      {$red+italic}Caused by:{/$}");

            for (i, cause) in e.chain().skip(1).enumerate() {
                print!("       {: >1$}", "", i * 2);
                println!("‣ {cause}");
            }
            println!();
        }
    }
}

async fn check_store(config: &Config) -> (Result<()>, Result<Vec<String>>) {
    if config.db.kind == db::StoreKind::Memory {
        let store = db::connect(&config.db).await.map(|_| ());
        return (store, Ok(vec![]));
    }

    // Opening already pings the server.
    match db::open_database(&config.db).await {
        Ok(database) => (Ok(()), db::ensure_collections(&database, &config.db).await),
        Err(e) => (Err(e), Err(anyhow!("cannot check collections without a connection"))),
    }
}
