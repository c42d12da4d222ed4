use arena_engine::{Combatant, CombatantId, NewCombatant, Roster, RosterError, resolve};

fn entry(name: &str) -> NewCombatant {
    NewCombatant {
        name: name.to_string(),
        ..NewCombatant::default()
    }
}

#[test]
fn added_combatants_get_reproducible_ids() {
    let mut first = Roster::with_seed(7);
    let mut second = Roster::with_seed(7);
    let a = first.add(entry("Gorgo")).unwrap().id.clone();
    let b = second.add(entry("Gorgo")).unwrap().id.clone();
    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 16);

    let c = first.add(entry("Gorgo")).unwrap().id.clone();
    assert_ne!(a, c);
    assert_eq!(first.len(), 2);
}

#[test]
fn form_defaults_and_trimming_are_applied() {
    let mut roster = Roster::new();
    let added = roster.add(entry("  Gorgo  ")).unwrap();
    assert_eq!(added.name, "Gorgo");
    assert_eq!(
        (added.attack, added.defense, added.speed, added.max_hp),
        (5, 2, 4, 20)
    );
}

#[test]
fn form_limits_are_enforced() {
    let mut roster = Roster::new();
    assert_eq!(roster.add(entry("   ")).unwrap_err(), RosterError::EmptyName);
    assert_eq!(
        roster.add(entry("A name far too long to fit")).unwrap_err(),
        RosterError::NameTooLong { len: 26, max: 20 }
    );

    let mut strong = entry("Brute");
    strong.attack = 100;
    assert_eq!(
        roster.add(strong).unwrap_err(),
        RosterError::OutOfRange {
            field: "attack",
            value: 100,
            min: 1,
            max: 99,
        }
    );

    let mut frail = entry("Wisp");
    frail.max_hp = 0;
    assert!(matches!(
        roster.add(frail),
        Err(RosterError::OutOfRange { field: "max_hp", .. })
    ));
    assert!(roster.is_empty());
}

#[test]
fn inserting_an_existing_id_is_rejected() {
    let mut roster = Roster::new();
    let gorgo = Combatant::new("gorgo", "Gorgo", 5, 2, 4, 20);
    roster.insert(gorgo.clone()).unwrap();
    assert_eq!(
        roster.insert(gorgo),
        Err(RosterError::DuplicateId("gorgo".into()))
    );
}

#[test]
fn find_accepts_ids_and_names() {
    let roster = Roster::from_combatants([
        Combatant::new("gorgo", "Gorgo", 5, 2, 4, 20),
        Combatant::new("slime", "Slime", 4, 1, 6, 18),
    ])
    .unwrap();
    assert_eq!(roster.find("slime").unwrap().name, "Slime");
    assert_eq!(roster.find("GORGO").unwrap().id, CombatantId::from("gorgo"));
    assert_eq!(roster.find("  slime ").unwrap().name, "Slime");
    assert_eq!(roster.find(" Gorgo\t").unwrap().id, CombatantId::from("gorgo"));
    assert_eq!(
        roster.find("nobody").unwrap_err(),
        RosterError::UnknownCombatant("nobody".into())
    );
    let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Gorgo", "Slime"]);
}

#[test]
fn selection_holds_at_most_two() {
    let mut roster = Roster::new();
    let a = roster.add(entry("A")).unwrap().id.clone();
    let b = roster.add(entry("B")).unwrap().id.clone();
    let c = roster.add(entry("C")).unwrap().id.clone();

    roster.select(&a).unwrap();
    roster.select(&a).unwrap();
    assert_eq!(roster.selected(), [a.clone()]);
    assert_eq!(
        roster.selected_pair().unwrap_err(),
        RosterError::IncompleteSelection(1)
    );

    roster.select(&b).unwrap();
    assert_eq!(roster.select(&c), Err(RosterError::SelectionFull));

    roster.toggle(&a).unwrap();
    roster.toggle(&c).unwrap();
    let (first, second) = roster.selected_pair().unwrap();
    assert_eq!((&first.id, &second.id), (&b, &c));

    assert!(matches!(
        roster.select(&"ghost".into()),
        Err(RosterError::UnknownCombatant(_))
    ));

    roster.reset_selection();
    assert!(roster.selected().is_empty());
    assert_eq!(roster.len(), 3);

    roster.select(&a).unwrap();
    roster.reset_all();
    assert!(roster.is_empty());
    assert!(roster.selected().is_empty());
}

#[test]
fn selected_pair_feeds_the_resolver() {
    let mut roster = Roster::with_seed(3);
    let slow = roster
        .add(NewCombatant {
            name: "Tortoise".into(),
            attack: 3,
            defense: 4,
            speed: 1,
            max_hp: 30,
        })
        .unwrap()
        .id
        .clone();
    let fast = roster
        .add(NewCombatant {
            name: "Hare".into(),
            attack: 6,
            defense: 1,
            speed: 9,
            max_hp: 10,
        })
        .unwrap()
        .id
        .clone();
    roster.select(&slow).unwrap();
    roster.select(&fast).unwrap();

    let (a, b) = roster.selected_pair().unwrap();
    let outcome = resolve(a, b).unwrap();
    assert_eq!(outcome.opener(), Some(&fast));
    assert_eq!(outcome.winner.id, slow);
}
