use comfy_table::{ContentArrangement, Table};
use rh_coc::CHARACTERISTICS;

pub fn run(count: usize, seed: Option<u64>) -> Result<(), String> {
    let mut session = super::table(seed);
    let characters = session.generate_candidates(count).map_err(|e| e.to_string())?;

    if let [character] = characters.as_slice() {
        println!("{}", character.render_block());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["#"];
    header.extend(CHARACTERISTICS.iter().map(|(key, _)| *key));
    header.extend(["HP", "MOV", "Total", "+LUCK"]);
    table.set_header(header);

    for (i, character) in characters.iter().enumerate() {
        let derived = character.derived();
        let mut row = vec![(i + 1).to_string()];
        row.extend(character.values().iter().map(|(_, v)| v.to_string()));
        row.extend([
            derived.hp.to_string(),
            derived.mov.to_string(),
            character.total_without_luck().to_string(),
            character.total_with_luck().to_string(),
        ]);
        table.add_row(row);
    }

    println!("{table}");
    Ok(())
}
