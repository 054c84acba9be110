use super::*;

#[test]
fn write_object_text() {
    // prn #-5 / stop
    let image = ObjectImage::from(
        vec![
            AddressedWord {
                address: 100,
                word: 0b1101000000,
            },
            AddressedWord {
                address: 101,
                word: 0b1111101100,
            },
            AddressedWord {
                address: 102,
                word: 0b1111000000,
            },
        ],
        vec![],
    );

    let mut out = Vec::new();
    write_object(&mut out, &image).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "aad\taa\nbcba\tdbaaa\nbcbb\tddcda\nbcbc\tddaaa\n"
    );
}

#[test]
fn write_object_appends_data_after_code() {
    let image = ObjectImage::from(
        vec![AddressedWord {
            address: 100,
            word: 0b1111000000,
        }],
        vec![
            AddressedWord {
                address: 101,
                word: 0b0000000111,
            },
            AddressedWord {
                address: 102,
                word: 0b1111111111,
            },
        ],
    );

    let mut out = Vec::new();
    out.write_object(&image).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "aab\tac\nbcba\tddaaa\nbcbb\taaabd\nbcbc\tddddd\n"
    );
}

#[test]
fn write_table_rows_in_order() {
    let entries = vec![
        TableEntry::new("LOOP", 101),
        TableEntry::new("E", 104),
        TableEntry::new("E", 110),
    ];

    let mut out = Vec::new();
    write_table(&mut out, &entries).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "LOOP\tbcbb\nE\tbcca\nE\tbcdc\n"
    );
}

#[test]
fn write_empty_table_produces_no_output() {
    let mut out = Vec::new();
    write_table(&mut out, &[]).unwrap();
    assert!(out.is_empty());
}
