use rh_table::CheckRequest;

pub fn run(target: i64, seed: Option<u64>, json: bool) -> Result<(), String> {
    let mut table = super::table(seed);
    let result = table
        .check(CheckRequest { target })
        .map_err(|e| e.to_string())?;

    if json {
        println!("{}", super::to_json(&result)?);
    } else {
        println!(
            "D100={}/{}: {}",
            result.roll,
            result.target,
            super::paint(result.outcome)
        );
    }
    Ok(())
}
