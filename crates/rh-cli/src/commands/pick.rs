use rh_dice::split_items;

pub fn choice(items: &str, num: i64, seed: Option<u64>) -> Result<(), String> {
    let items = split_items(items);
    let mut table = super::table(seed);
    let picked = table.choose(&items, num).map_err(|e| e.to_string())?;
    println!(
        "From {}, pick {num} -> {}",
        table.preview(&items, "items"),
        table.preview(&picked, "picks")
    );
    Ok(())
}

pub fn shuffle(items: &str, seed: Option<u64>) -> Result<(), String> {
    let items = split_items(items);
    let mut table = super::table(seed);
    let shuffled = table.shuffle(&items).map_err(|e| e.to_string())?;
    println!(
        "From {}, shuffled -> {}",
        table.preview(&items, "items"),
        table.preview(&shuffled, "items")
    );
    Ok(())
}

pub fn flip(coins: i64, seed: Option<u64>) -> Result<(), String> {
    let mut table = super::table(seed);
    let result = table.flip(coins).map_err(|e| e.to_string())?;
    println!(
        "Flips: {} ({} heads, {} tails)",
        table.preview(&result.flips, "coins"),
        result.heads(),
        result.tails()
    );
    Ok(())
}
