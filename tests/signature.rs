use jitlog::signature::{class_name_from_signature, SignatureError};

#[test]
fn packaged_class_becomes_dotted() {
    assert_eq!(
        class_name_from_signature("Lcom/example/Foo;").unwrap(),
        "com.example.Foo"
    );
}

#[test]
fn package_less_class_keeps_bare_name() {
    assert_eq!(class_name_from_signature("LClass;").unwrap(), "Class");
}

#[test]
fn deep_packages_convert_every_separator() {
    assert_eq!(
        class_name_from_signature("Lpkg/sub/deeper/Class;").unwrap(),
        "pkg.sub.deeper.Class"
    );
}

#[test]
fn inner_class_dollar_markers_pass_through() {
    assert_eq!(
        class_name_from_signature("Ljava/util/Map$Entry;").unwrap(),
        "java.util.Map$Entry"
    );
}

#[test]
fn text_after_first_terminator_is_dropped() {
    // GetClassSignature never produces this, but the first ';' still wins.
    assert_eq!(class_name_from_signature("La/B;leftover").unwrap(), "a.B");
}

#[test]
fn missing_terminator_is_rejected() {
    assert_eq!(
        class_name_from_signature("Lcom/example/Foo"),
        Err(SignatureError::UnterminatedClass)
    );
}

#[test]
fn primitive_descriptor_is_rejected() {
    assert_eq!(class_name_from_signature("I"), Err(SignatureError::NotAClass));
}

#[test]
fn array_descriptor_is_rejected() {
    assert_eq!(
        class_name_from_signature("[Ljava/lang/String;"),
        Err(SignatureError::NotAClass)
    );
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(class_name_from_signature(""), Err(SignatureError::NotAClass));
}

#[test]
fn same_input_always_yields_same_output() {
    let first = class_name_from_signature("Lcom/example/Foo;");
    for _ in 0..16 {
        assert_eq!(class_name_from_signature("Lcom/example/Foo;"), first);
    }
}
