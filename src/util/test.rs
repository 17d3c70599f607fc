use serde_json::to_string_pretty;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;

/// Removes `loc` fields and flattens `stx` wrappers so tests can assert on syntax alone.
pub fn strip_locs(value: &mut Value) {
  match value {
    Value::Object(map) => {
      map.remove("loc");
      if let Some(mut stx) = map.remove("stx") {
        strip_locs(&mut stx);
        match stx {
          Value::Object(stx_map) => {
            if map.is_empty() {
              *value = Value::Object(stx_map);
              strip_locs(value);
              return;
            } else {
              for (k, v) in stx_map {
                map.entry(k).or_insert(v);
              }
            }
          }
          other => {
            if map.is_empty() {
              *value = other;
              strip_locs(value);
              return;
            } else {
              map.insert("stx".to_string(), other);
            }
          }
        }
      }
      for v in map.values_mut() {
        strip_locs(v);
      }
    }
    Value::Array(items) => {
      for item in items {
        strip_locs(item);
      }
    }
    _ => {}
  }
}

pub fn assert_syntax_eq(mut actual: Value, mut expected: Value) {
  strip_locs(&mut actual);
  strip_locs(&mut expected);
  if actual != expected {
    let expected_fmt = to_string_pretty(&expected).unwrap();
    let actual_fmt = to_string_pretty(&actual).unwrap();
    let mut msg = "Syntax mismatch:\n".to_string();
    let diff = TextDiff::from_lines(&expected_fmt, &actual_fmt);
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      msg.push_str(sign);
      msg.push_str(change.as_str().unwrap());
    }
    panic!("{}", msg);
  }
}
