//! Java language definition

use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{KeywordGroup, ObjectSplitter};
use crate::syntax::tokens::Category;

const API_DOCS: &str = "http://java.sun.com/j2se/1.5.0/docs/api";

/// Create Java language definition
pub fn java_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("java", "Java(TM) 2 Platform Standard Edition 5.0");
    lang.add_extension("java");

    // Import statements are not comments
    lang.add_comment_single(1, "//", "color: #808080; font-style: italic;");
    lang.add_comment_multi("/*", "*/");
    lang.quote_marks = vec!['\'', '"'];
    lang.escape_char = Some('\\');

    // Control flow
    lang.add_keywords(
        KeywordGroup::new(1, &[
            "case", "default", "do", "else", "for", "goto", "if", "switch", "while",
        ]),
        "color: #b1b100;",
    );

    lang.add_keywords(
        KeywordGroup::new(2, &[
            "break", "continue", "return", "throw", "try", "catch", "finally",
            "abstract", "assert", "class", "const", "enum", "extends", "final",
            "implements", "import", "instanceof", "interface", "native", "new",
            "package", "private", "protected", "public", "static", "strictfp",
            "super", "synchronized", "this", "throws", "transient", "volatile",
        ]),
        "color: #000000; font-weight: bold;",
    );

    // Primitive types
    lang.add_keywords(
        KeywordGroup::new(3, &[
            "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
        ]),
        "color: #993333;",
    );

    // Literals
    lang.add_keywords(
        KeywordGroup::new(4, &["false", "null", "true"]),
        "color: #b13366;",
    );

    lang.add_keywords(
        KeywordGroup::new(5, &[
            "BufferedInputStream", "BufferedOutputStream", "BufferedReader",
            "BufferedWriter", "ByteArrayInputStream", "ByteArrayOutputStream",
            "Closeable", "DataInput", "DataOutput", "EOFException", "File",
            "FileInputStream", "FileNotFoundException", "FileOutputStream",
            "FileReader", "FileWriter", "FilenameFilter", "Flushable",
            "IOException", "InputStreamReader", "ObjectInputStream",
            "ObjectOutputStream", "OutputStreamWriter", "PrintStream",
            "PrintWriter", "RandomAccessFile", "Reader", "Serializable",
            "StringReader", "StringWriter", "UnsupportedEncodingException", "Writer",
        ])
        .with_url(&format!("{}/java/io/{{FNAME}}.html", API_DOCS)),
        "color: #aaaadd; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(6, &[
            "AbstractMethodError", "Appendable", "ArithmeticException",
            "ArrayIndexOutOfBoundsException", "AssertionError", "Boolean", "Byte",
            "CharSequence", "Character", "Class", "ClassCastException",
            "ClassLoader", "ClassNotFoundException", "CloneNotSupportedException",
            "Cloneable", "Comparable", "Deprecated", "Double", "Enum", "Error",
            "Exception", "Float", "IllegalArgumentException",
            "IllegalStateException", "IndexOutOfBoundsException", "Integer",
            "InterruptedException", "Iterable", "Long", "Math",
            "NullPointerException", "Number", "NumberFormatException",
            "OutOfMemoryError", "Override", "Process", "ProcessBuilder",
            "Runnable", "Runtime", "RuntimeException", "SecurityException",
            "Short", "StackOverflowError", "StrictMath", "String", "StringBuffer",
            "StringBuilder", "SuppressWarnings", "System", "Thread", "ThreadLocal",
            "Throwable", "UnsupportedOperationException", "Void",
        ])
        .with_url(&format!("{}/java/lang/{{FNAME}}.html", API_DOCS)),
        "color: #aaaadd; font-weight: bold;",
    );

    lang.add_keywords(
        KeywordGroup::new(7, &[
            "AbstractCollection", "AbstractList", "AbstractMap", "AbstractSet",
            "ArrayList", "Arrays", "BitSet", "Calendar", "Collection",
            "Collections", "Comparator", "ConcurrentModificationException",
            "EnumMap", "EnumSet", "Enumeration", "HashMap", "HashSet", "Hashtable",
            "Iterator", "LinkedHashMap", "LinkedHashSet", "LinkedList",
            "ListIterator", "Locale", "Map", "NoSuchElementException",
            "PriorityQueue", "Properties", "Queue", "Random", "ResourceBundle",
            "Scanner", "Set", "SortedMap", "SortedSet", "Stack", "StringTokenizer",
            "TimeZone", "TreeMap", "TreeSet", "UUID", "Vector", "WeakHashMap",
        ])
        .with_url(&format!("{}/java/util/{{FNAME}}.html", API_DOCS)),
        "color: #aaaadd; font-weight: bold;",
    );

    lang.symbols = vec!['*', '&', '%', '!', ';', '<', '>', '?'];

    if let Ok(splitter) = ObjectSplitter::new(1, ".") {
        lang.add_object_splitter(splitter, "color: #006600;");
    }

    lang.set_style(Category::CommentMulti, "color: #808080; font-style: italic;");
    lang.set_style(Category::Escape, "color: #000099; font-weight: bold;");
    lang.set_style(Category::Bracket, "color: #66cc66;");
    lang.set_style(Category::String, "color: #ff0000;");
    lang.set_style(Category::Number, "color: #cc66cc;");
    lang.set_style(Category::Symbol, "color: #66cc66;");

    lang
}
