use rh_table::EvaluateRequest;

pub fn run(expr: &str, seed: Option<u64>, json: bool) -> Result<(), String> {
    let mut table = super::table(seed);
    let result = table
        .evaluate(&EvaluateRequest {
            expr: expr.to_string(),
        })
        .map_err(|e| e.to_string())?;

    if json {
        println!("{}", super::to_json(&result)?);
    } else {
        println!("{}", super::format_roll(&result));
    }
    Ok(())
}
