use botwire::descriptor::{sanitize, Primitive, Shape, TypeDesc};
use botwire::Error;

fn classify(raw: &str) -> TypeDesc {
    TypeDesc::classify(raw).expect("classify")
}

#[test]
fn every_shape_is_recognized() {
    let cases = [
        ("int", Shape::Primitive),
        ("float", Shape::Primitive),
        ("bool", Shape::Primitive),
        ("str", Shape::Primitive),
        ("Optional[str]", Shape::Optional),
        ("List[MessageEntity]", Shape::List),
        ("List[List[KeyboardButton]]", Shape::ListOfList),
        ("Union[Message, bool]", Shape::Union),
        ("Sticker", Shape::Record),
    ];
    for (raw, shape) in cases {
        assert_eq!(classify(raw).shape(), shape, "{raw}");
    }
}

#[test]
fn list_of_list_is_never_a_plain_list() {
    let nested = classify("List[List[PhotoSize]]");
    assert!(nested.is_list_of_list());
    assert!(!nested.is_list());
    assert_eq!(nested.element_type().unwrap(), &TypeDesc::record("PhotoSize"));

    let flat = classify("List[PhotoSize]");
    assert!(flat.is_list());
    assert!(!flat.is_list_of_list());
    assert_ne!(nested, flat);
}

#[test]
fn optional_navigation() {
    let desc = classify("Optional[List[List[PhotoSize]]]");
    assert!(desc.is_optional());
    let inner = desc.unwrap_optional().unwrap();
    assert!(inner.is_list_of_list());
    assert_eq!(desc.strip_optional(), inner);

    let err = inner.unwrap_optional().unwrap_err();
    assert!(matches!(err, Error::NotOptional(ref s) if s == "List[List[PhotoSize]]"));
}

#[test]
fn union_branches_keep_order() {
    let desc = classify("Union[InputFile, str]");
    assert_eq!(
        desc.branches().unwrap(),
        &[
            TypeDesc::record("InputFile"),
            TypeDesc::Primitive(Primitive::Str)
        ]
    );
    assert!(matches!(
        classify("str").branches(),
        Err(Error::NotUnion(_))
    ));
    assert!(matches!(
        classify("User").element_type(),
        Err(Error::NotList(_))
    ));
}

#[test]
fn malformed_annotations() {
    let bad = [
        "",
        "Optional[Optional[int]]",
        "Optional[int",
        "List[]",
        "Union[int]",
        "integer",
        "List[int] extra",
        "Dict[str, int]",
    ];
    for raw in bad {
        assert!(
            matches!(TypeDesc::classify(raw), Err(Error::MalformedAnnotation { .. })),
            "{raw:?} should be malformed"
        );
    }
}

#[test]
fn malformed_error_names_the_annotation() {
    let err = TypeDesc::classify("Optional[Optional[int]]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed annotation `Optional[Optional[int]]`: Optional cannot wrap another Optional"
    );
}

#[test]
fn canonical_form_round_trips() {
    let raw = "Optional[Union[\n    InlineKeyboardMarkup,\n    ReplyKeyboardMarkup,\n    ForceReply,\n]]";
    let desc = classify(raw);
    let canonical = desc.to_string();
    assert_eq!(
        canonical,
        "Optional[Union[InlineKeyboardMarkup, ReplyKeyboardMarkup, ForceReply]]"
    );
    assert_eq!(classify(&canonical), desc);
}

#[test]
fn scalar_fields() {
    assert!(classify("Optional[int]").is_scalar_field());
    assert!(classify("str").is_scalar_field());
    assert!(!classify("Optional[User]").is_scalar_field());
    assert!(!classify("List[str]").is_scalar_field());
}

#[test]
fn sanitized_runtime_strings_classify() {
    let raw = "typing.Union[telegrambotapiwrapper.typelib.Message, <class 'bool'>]";
    let desc = classify(&sanitize(raw));
    assert_eq!(desc.to_string(), "Union[Message, bool]");
}
