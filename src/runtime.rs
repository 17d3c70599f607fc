//! The runtime support library, loaded once per execution context before any
//! rewritten snippet runs.
//!
//! Rewritten code reacts to values tagged with the synthetic-promise symbol,
//! but builtin higher-order methods would pass tagged callback results through
//! unawaited. This library patches those methods with manual-loop drivers that
//! start synchronously and only go async (returning a tagged promise that
//! enclosing rewritten code then awaits) if a tagged value actually shows up.
//! It also installs the `Function.prototype.toString` override that decodes
//! the source markers the rewriter plants in every user function.
//!
//! The text is plain script syntax the rewriter's own parser accepts, which
//! the tests below verify.

pub const RUNTIME_SUPPORT: &str = r#"(() => {
  'use strict';
  const syntheticPromiseSymbol = Symbol.for('@@mongosh.syntheticPromise');

  function markSyntheticPromise(p) {
    return Object.defineProperty(p, syntheticPromiseSymbol, { value: true });
  }
  function isSyntheticPromise(p) {
    return !!(p && p[syntheticPromiseSymbol]);
  }

  // Runs a generator that yields each maybe-tagged callback result and is
  // resumed with the settled value. Stays fully synchronous until a yielded
  // value is actually a tagged promise; from then on the remainder runs in an
  // async context and the overall result is itself a tagged promise.
  function drive(gen) {
    let step = gen.next();
    while (!step.done) {
      const value = step.value;
      if (isSyntheticPromise(value)) {
        return markSyntheticPromise((async () => {
          let resumed = gen.next(await value);
          while (!resumed.done) {
            const v = resumed.value;
            resumed = gen.next(isSyntheticPromise(v) ? await v : v);
          }
          return resumed.value;
        })());
      }
      step = gen.next(value);
    }
    return step.value;
  }

  function* forEachImpl(self, callback, thisArg) {
    const length = self.length;
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      yield callback.call(thisArg, self[i], i, self);
    }
    return undefined;
  }

  function* mapImpl(self, callback, thisArg) {
    const length = self.length;
    const result = new Array(length);
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      result[i] = yield callback.call(thisArg, self[i], i, self);
    }
    return result;
  }

  function* typedMapImpl(self, callback, thisArg) {
    const length = self.length;
    const result = new self.constructor(length);
    for (let i = 0; i < length; i++) {
      result[i] = yield callback.call(thisArg, self[i], i, self);
    }
    return result;
  }

  function* filterImpl(self, callback, thisArg) {
    const length = self.length;
    const kept = [];
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      const value = self[i];
      if (yield callback.call(thisArg, value, i, self)) kept.push(value);
    }
    return kept;
  }

  function* typedFilterImpl(self, callback, thisArg) {
    const length = self.length;
    const kept = [];
    for (let i = 0; i < length; i++) {
      const value = self[i];
      if (yield callback.call(thisArg, value, i, self)) kept.push(value);
    }
    return new self.constructor(kept);
  }

  function* findImpl(self, callback, thisArg) {
    const length = self.length;
    for (let i = 0; i < length; i++) {
      const value = self[i];
      if (yield callback.call(thisArg, value, i, self)) return value;
    }
    return undefined;
  }

  function* findIndexImpl(self, callback, thisArg) {
    const length = self.length;
    for (let i = 0; i < length; i++) {
      if (yield callback.call(thisArg, self[i], i, self)) return i;
    }
    return -1;
  }

  function* someImpl(self, callback, thisArg) {
    const length = self.length;
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      if (yield callback.call(thisArg, self[i], i, self)) return true;
    }
    return false;
  }

  function* everyImpl(self, callback, thisArg) {
    const length = self.length;
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      if (!(yield callback.call(thisArg, self[i], i, self))) return false;
    }
    return true;
  }

  function* reduceImpl(self, callback, initial, hasInitial) {
    const length = self.length;
    let acc = initial;
    let seeded = hasInitial;
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      if (!seeded) {
        acc = self[i];
        seeded = true;
        continue;
      }
      acc = yield callback(acc, self[i], i, self);
    }
    if (!seeded) throw new TypeError('Reduce of empty array with no initial value');
    return acc;
  }

  function* reduceRightImpl(self, callback, initial, hasInitial) {
    let acc = initial;
    let seeded = hasInitial;
    for (let i = self.length - 1; i >= 0; i--) {
      if (!(i in self)) continue;
      if (!seeded) {
        acc = self[i];
        seeded = true;
        continue;
      }
      acc = yield callback(acc, self[i], i, self);
    }
    if (!seeded) throw new TypeError('Reduce of empty array with no initial value');
    return acc;
  }

  function* flatMapImpl(self, callback, thisArg) {
    const length = self.length;
    const result = [];
    for (let i = 0; i < length; i++) {
      if (!(i in self)) continue;
      const mapped = yield callback.call(thisArg, self[i], i, self);
      if (Array.isArray(mapped)) {
        result.push(...mapped);
      } else {
        result.push(mapped);
      }
    }
    return result;
  }

  function* entriesForEachImpl(self, entries, callback, thisArg) {
    for (const [key, value] of entries) {
      yield callback.call(thisArg, value, key, self);
    }
    return undefined;
  }

  function patch(proto, name, replacement) {
    if (!proto[name]) return;
    Object.defineProperty(proto, name, {
      value: replacement,
      writable: true,
      configurable: true
    });
  }

  function patchDriven(proto, name, impl) {
    patch(proto, name, function (callback, thisArg) {
      return drive(impl(this, callback, thisArg));
    });
  }

  function patchReducer(proto, name, impl) {
    patch(proto, name, function (callback, initial) {
      return drive(impl(this, callback, initial, arguments.length > 1));
    });
  }

  // The comparator may return a tagged promise (e.g. a rewritten function
  // passed by reference). Sort has no async fallback, so that is always an
  // error; otherwise native sort runs with its exact builtin ordering.
  function patchSort(proto) {
    const originalSort = proto.sort;
    patch(proto, 'sort', function (compareFn) {
      if (compareFn === undefined) return originalSort.call(this);
      return originalSort.call(this, (...args) => {
        const result = compareFn(...args);
        if (isSyntheticPromise(result)) {
          throw new Error('[ASYNC-10012] Result of expression "compareFn(...args)" cannot be used in this context');
        }
        return result;
      });
    });
  }

  function patchIterationMethods(proto, mapImplForProto, filterImplForProto) {
    patchDriven(proto, 'forEach', forEachImpl);
    patchDriven(proto, 'map', mapImplForProto);
    patchDriven(proto, 'filter', filterImplForProto);
    patchDriven(proto, 'find', findImpl);
    patchDriven(proto, 'findIndex', findIndexImpl);
    patchDriven(proto, 'some', someImpl);
    patchDriven(proto, 'every', everyImpl);
    patchReducer(proto, 'reduce', reduceImpl);
    patchReducer(proto, 'reduceRight', reduceRightImpl);
    patchSort(proto);
  }

  patchIterationMethods(Array.prototype, mapImpl, filterImpl);
  patchDriven(Array.prototype, 'flatMap', flatMapImpl);
  patchIterationMethods(Object.getPrototypeOf(Int8Array.prototype), typedMapImpl, typedFilterImpl);

  const mapEntries = Map.prototype.entries;
  patch(Map.prototype, 'forEach', function (callback, thisArg) {
    return drive(entriesForEachImpl(this, mapEntries.call(this), callback, thisArg));
  });
  const setEntries = Set.prototype.entries;
  patch(Set.prototype, 'forEach', function (callback, thisArg) {
    return drive(entriesForEachImpl(this, setEntries.call(this), callback, thisArg));
  });

  // Rewritten functions carry their original text, URI-encoded, in a leading
  // string literal; toString returns the decoded text so user functions print
  // as written.
  const originalToString = Function.prototype.toString;
  const markerStart = '<async_rewriter>';
  const markerEnd = '</>';
  patch(Function.prototype, 'toString', function toString() {
    const source = originalToString.call(this);
    const start = source.indexOf(markerStart);
    if (start !== -1) {
      const end = source.indexOf(markerEnd, start);
      if (end !== -1) {
        return decodeURIComponent(source.slice(start + markerStart.length, end));
      }
    }
    return source;
  });
})();
"#;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::Parser;
  use crate::rewrite::SYMBOL_SYNTHETIC_PROMISE;

  #[test]
  fn test_support_code_is_valid_script_syntax() {
    let top = Parser::new(Lexer::new(RUNTIME_SUPPORT))
      .parse_top_level()
      .unwrap();
    let out = emit_js(&top);
    assert!(out.contains(&format!("Symbol.for('{SYMBOL_SYNTHETIC_PROMISE}')")));
  }

  #[test]
  fn test_patches_every_promised_method() {
    for name in [
      "forEach",
      "map",
      "filter",
      "find",
      "findIndex",
      "some",
      "every",
      "reduce",
      "reduceRight",
      "flatMap",
      "sort",
    ] {
      assert!(RUNTIME_SUPPORT.contains(name), "missing {name}");
    }
    assert!(RUNTIME_SUPPORT.contains("Int8Array.prototype"));
    assert!(RUNTIME_SUPPORT.contains("Map.prototype"));
    assert!(RUNTIME_SUPPORT.contains("Set.prototype"));
  }

  #[test]
  fn test_comparator_violations_quote_the_call() {
    assert!(RUNTIME_SUPPORT
      .contains("[ASYNC-10012] Result of expression \"compareFn(...args)\""));
  }
}
