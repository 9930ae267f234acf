use colored::Colorize;

pub fn run(count: i64, sides: i64, seed: Option<u64>) -> Result<(), String> {
    let mut table = super::table(seed);
    let roll = table.quick_roll(count, sides).map_err(|e| e.to_string())?;

    println!(
        "{}d{} -> {} = {}",
        roll.count,
        roll.sides,
        table.preview(&roll.rolls, "rolls"),
        roll.total().to_string().bold()
    );
    if roll.rolls.len() > 1 {
        println!("  highest {}, lowest {}", roll.highest(), roll.lowest());
    }
    Ok(())
}
