// replace.rs - Replace-all driver and template expansion entry points.
//
// The driver walks the match cursor once, copying each gap between matches
// verbatim and appending whatever the producer writes for the match itself.

use std::borrow::Cow;

use crate::captures::Captures;
use crate::region::Region;
use crate::regex::Regex;
use crate::template::Template;

// Inputs are `&str` and matches fall on char boundaries, so this only
// substitutes U+FFFD if a custom engine reports a span mid-character.
fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn str_result<'t>(src: &'t str, out: Cow<'t, [u8]>) -> Cow<'t, str> {
    match out {
        Cow::Borrowed(_) => Cow::Borrowed(src),
        Cow::Owned(bytes) => Cow::Owned(into_string(bytes)),
    }
}

impl Regex {
    /// Builds the output from gaps and produced replacements. Borrows `src`
    /// when there is nothing to replace.
    pub(crate) fn replace_all_by<'t, F>(&self, src: &'t [u8], mut produce: F) -> Cow<'t, [u8]>
    where
        F: FnMut(&Captures<'t>, &mut Vec<u8>),
    {
        let mut matches = self.matches(src, -1).peekable();
        if matches.peek().is_none() {
            return Cow::Borrowed(src);
        }
        let mut out = Vec::with_capacity(src.len());
        let mut last_end = 0;
        for region in matches {
            let (start, end) = (region.start(), region.end());
            out.extend_from_slice(&src[last_end..start]);
            let caps = Captures::new(src, region, self.names().clone());
            produce(&caps, &mut out);
            last_end = end;
        }
        out.extend_from_slice(&src[last_end..]);
        Cow::Owned(out)
    }

    /// Replaces every match with `template` expanded against it.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new("a+").unwrap();
    /// assert_eq!(re.replace_all_str("banana", "($0)"), "b(a)n(a)n(a)");
    /// ```
    pub fn replace_all<'t>(&self, src: &'t [u8], template: &[u8]) -> Cow<'t, [u8]> {
        let template = Template::parse(template);
        self.replace_all_by(src, |caps, out| template.expand(caps, out))
    }

    pub fn replace_all_str<'t>(&self, src: &'t str, template: &str) -> Cow<'t, str> {
        str_result(src, self.replace_all(src.as_bytes(), template.as_bytes()))
    }

    /// Replaces every match with `replacement`, byte for byte.
    pub fn replace_all_literal<'t>(&self, src: &'t [u8], replacement: &[u8]) -> Cow<'t, [u8]> {
        self.replace_all_by(src, |_, out| out.extend_from_slice(replacement))
    }

    pub fn replace_all_literal_str<'t>(&self, src: &'t str, replacement: &str) -> Cow<'t, str> {
        str_result(src, self.replace_all_literal(src.as_bytes(), replacement.as_bytes()))
    }

    /// Replaces every match with what `f` returns for the matched text.
    pub fn replace_all_func<'t, F, R>(&self, src: &'t [u8], mut f: F) -> Cow<'t, [u8]>
    where
        F: FnMut(&[u8]) -> R,
        R: AsRef<[u8]>,
    {
        self.replace_all_by(src, |caps, out| {
            let matched = caps.get(0).map_or(&[][..], |m| m.as_bytes());
            out.extend_from_slice(f(matched).as_ref());
        })
    }

    pub fn replace_all_str_func<'t, F, R>(&self, src: &'t str, mut f: F) -> Cow<'t, str>
    where
        F: FnMut(&str) -> R,
        R: AsRef<str>,
    {
        let out = self.replace_all_by(src.as_bytes(), |caps, out| {
            let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            out.extend_from_slice(f(&*matched).as_ref().as_bytes());
        });
        str_result(src, out)
    }

    /// Replaces every match with what `f` returns for its captures.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new(r"(?<n>\d+)").unwrap();
    /// let out = re.replace_all_with(b"a1b22", |caps| {
    ///     let n = caps.name("n").map_or(0, |m| m.len());
    ///     n.to_string()
    /// });
    /// assert_eq!(&out[..], b"a1b2");
    /// ```
    pub fn replace_all_with<'t, F, R>(&self, src: &'t [u8], mut f: F) -> Cow<'t, [u8]>
    where
        F: FnMut(&Captures<'t>) -> R,
        R: AsRef<[u8]>,
    {
        self.replace_all_by(src, |caps, out| out.extend_from_slice(f(caps).as_ref()))
    }

    /// Appends `template`, expanded against the match `region` of `src`, to
    /// `dst`.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new(r"(?m)(?P<key>\w+):\s+(?P<value>\w+)$").unwrap();
    /// let src = "a: 1\nb: 2\n";
    /// let mut out = String::new();
    /// for region in re.find_all_str_submatch_index(src, -1) {
    ///     re.expand_str(&mut out, "$key=$value;", src, &region);
    /// }
    /// assert_eq!(out, "a=1;b=2;");
    /// ```
    pub fn expand(&self, dst: &mut Vec<u8>, template: &[u8], src: &[u8], region: &Region) {
        let caps = Captures::new(src, region.clone(), self.names().clone());
        Template::parse(template).expand(&caps, dst);
    }

    pub fn expand_str(&self, dst: &mut String, template: &str, src: &str, region: &Region) {
        let mut out = Vec::new();
        self.expand(&mut out, template.as_bytes(), src.as_bytes(), region);
        dst.push_str(&into_string(out));
    }
}
